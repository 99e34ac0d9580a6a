pub mod debounce;
pub mod engine;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod resources;
pub mod routes;
pub mod store;
pub mod validation;

pub use debounce::{DebounceState, Debounced, Debouncer};
pub use engine::{Indexed, UnifiedSearch};
pub use errors::ApiError;
pub use filtering::{
    AdvancedFilter, Document, FilterState, FilterValue, Page, PageWindow, Pagination, SortSpec,
    TextQuery,
};
pub use models::{FilterDescriptor, FilterKind, FilterOptions, SearchConfig, SearchResult};
pub use resources::SearchableResource;
pub use routes::{SharedStore, api_router, resource_router};
pub use store::{DataSource, MemoryStore};
pub use validation::{Validatable, ValidationError, ValidationErrors};
