mod storage;

pub use storage::{IErrorGroupStorage, ITagCatalog};
