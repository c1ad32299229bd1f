pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer, TypedValue};
