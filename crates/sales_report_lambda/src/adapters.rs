pub mod appwrite;
pub mod document_store;
