mod error;
mod serialization;
mod traits;

pub use error::{Cause, ErrorKind, RepositoryError, Result};
pub use serialization::{decode_record, encode_record};
pub use traits::{LocalStore, RemoteSource, SortOrderSource};
