pub mod address;
pub mod builder;
pub mod caip19;
pub mod chains;
pub mod error;
pub mod index;
pub mod key;
pub mod record;
pub mod resolver;
pub mod snapshot;
pub mod token;
pub mod validate;

// Re-exports for convenience
pub use address::Address;
pub use builder::{
    BuildFailure, BuildPhase, BuildReport, BuiltRegistry, RecordError, RegistryBuilder,
    SkippedRecord,
};
pub use caip19::AssetId;
pub use error::{Caip19ParseError, CollisionError, Error, KeyError, ValidationError};
pub use index::RegistryIndex;
pub use key::TokenKey;
pub use record::{RawTokenRecord, TokenList};
pub use snapshot::RegistryHandle;
pub use token::{CanonicalToken, SymbolClash};

/// Build a registry index from raw records with default settings.
///
/// This is the main entry point: it runs the full pipeline (validation,
/// keying, collision resolution, index construction) and returns the
/// immutable index together with a report of everything that was excluded.
pub fn build_registry(records: &[RawTokenRecord]) -> Result<BuiltRegistry, BuildFailure> {
    RegistryBuilder::new().build(records)
}
