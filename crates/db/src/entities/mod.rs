//! `SeaORM` entity definitions for the Flutr schema.
//!
//! One module per table. `butterfly_species` is the only global table;
//! every other table carries an `institution_id` tenant column.

pub mod butterfly_species;
pub mod butterfly_species_institution;
pub mod institution_news;
pub mod institutions;
pub mod release_events;
pub mod release_items;
pub mod shipment_items;
pub mod shipments;
pub mod suppliers;
pub mod users;
