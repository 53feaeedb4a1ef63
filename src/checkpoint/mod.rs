mod manager;
mod metadata;

pub use manager::ModelVersionStore;
pub use metadata::ModelMetadata;
