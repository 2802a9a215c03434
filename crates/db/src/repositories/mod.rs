//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every read and write on tenant-owned data is scoped by institution; the
//! cross-table tenant checks live in `crate::tenancy` and run inside the
//! writing transaction.

pub mod institution;
pub mod news;
pub mod release;
pub mod shipment;
pub mod species;
pub mod species_link;
pub mod supplier;
pub mod user;

pub use institution::{
    CreateInstitutionInput, InstitutionError, InstitutionRepository, UpdateInstitutionInput,
};
pub use news::{CreateNewsInput, NewsError, NewsRepository, UpdateNewsInput};
pub use release::{
    AddReleaseItemInput, CreateReleaseEventInput, ReleaseError, ReleaseRepository,
};
pub use shipment::{
    AddShipmentItemInput, CreateShipmentInput, ShipmentError, ShipmentRepository,
    UpdateShipmentItemInput,
};
pub use species::{CreateSpeciesInput, SpeciesError, SpeciesRepository, UpdateSpeciesInput};
pub use species_link::{SpeciesLinkError, SpeciesLinkRepository, SpeciesOverrides};
pub use supplier::{CreateSupplierInput, SupplierError, SupplierRepository, UpdateSupplierInput};
pub use user::{CreateUserInput, UserError, UserRepository};
