pub mod rtf;
pub mod file;
pub mod link;

pub use rtf::rtf_to_text;
pub use file::text_from_upload;
pub use link::LinkFetcher;
