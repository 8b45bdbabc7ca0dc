//! Entity dictionary: records, schema metadata and pattern extraction

pub mod builder;
pub mod record;
pub mod schema;

pub use builder::{build_dictionary, DictionaryBuilder, DictionaryStats};
pub use record::EntityRecord;
pub use schema::{RecordSchema, SchemaDef, SchemaIndex, SchemaModel};
