// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod columns;
pub mod dates;
pub mod debounce;
pub mod drafts;
pub mod ids;
pub mod location;
pub mod model;
pub mod pagination;
pub mod state;

pub use columns::*;
pub use dates::*;
pub use debounce::*;
pub use drafts::*;
pub use ids::*;
pub use location::*;
pub use model::*;
pub use pagination::*;
pub use state::*;
