/// Secret handling: sops key acquisition and age decryption.
pub mod age;
pub mod decrypted_file;

pub use age::{AgeDecryptor, DEFAULT_KEY_PATH, decrypt_age};
pub use decrypted_file::get_decrypted_file;
