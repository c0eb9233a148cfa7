pub mod archive;
pub mod pe;
pub mod stream;

// Re-exports for convenience
pub use archive::{
    assemble, list_entries, ArchiveError, AssemblyProgress, AssemblyReport, DiskResolver,
    Located, PathResolver, StorePolicy,
};
pub use stream::{ChunkReader, StreamError, Tag};
