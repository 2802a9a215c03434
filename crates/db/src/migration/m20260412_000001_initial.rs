//! Initial database migration.
//!
//! Creates all ten tables with their named uniqueness constraints and
//! delete-policy foreign keys. Constraint and table names are stable
//! identifiers consumed by reporting and export collaborators; do not
//! rename them.
//!
//! Tenant model:
//! - Global (shared): butterfly_species
//! - Tenant-scoped (owned by an institution): everything else
//!
//! Tenant enforcement is declared twice: composite foreign keys below, and
//! the procedural checks in `crate::tenancy` that run inside the writing
//! transaction.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TENANT ROOT
        // ============================================================
        db.execute_unprepared(INSTITUTIONS_SQL).await?;
        db.execute_unprepared(INSTITUTION_NEWS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 2: GLOBAL CATALOG
        // ============================================================
        db.execute_unprepared(BUTTERFLY_SPECIES_SQL).await?;
        db.execute_unprepared(BUTTERFLY_SPECIES_INSTITUTION_SQL)
            .await?;

        // ============================================================
        // PART 3: SUPPLY CHAIN
        // ============================================================
        db.execute_unprepared(SUPPLIERS_SQL).await?;
        db.execute_unprepared(SHIPMENTS_SQL).await?;
        db.execute_unprepared(SHIPMENT_ITEMS_SQL).await?;

        // ============================================================
        // PART 4: RELEASES
        // ============================================================
        db.execute_unprepared(RELEASE_EVENTS_SQL).await?;
        db.execute_unprepared(RELEASE_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const INSTITUTIONS_SQL: &str = r"
CREATE TABLE institutions (
    id BIGSERIAL PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,

    name TEXT NOT NULL,
    street_address TEXT NOT NULL,
    extended_address TEXT,
    city TEXT NOT NULL,
    state_province TEXT NOT NULL,
    postal_code TEXT NOT NULL,
    time_zone TEXT,
    country TEXT NOT NULL,

    phone_number TEXT,
    email_address TEXT UNIQUE,

    iabes_member BOOLEAN NOT NULL DEFAULT false,
    theme_colors TEXT[],

    website_url TEXT,
    facility_image_url TEXT,
    logo_url TEXT,
    description TEXT,
    social_links JSONB,
    stats_active BOOLEAN NOT NULL DEFAULT true,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_institutions_slug ON institutions(slug);
";

const INSTITUTION_NEWS_SQL: &str = r"
CREATE TABLE institution_news (
    id BIGSERIAL PRIMARY KEY,

    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    title TEXT NOT NULL,
    content TEXT NOT NULL,
    image_url TEXT,

    is_active BOOLEAN NOT NULL DEFAULT true,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_institution_news_active ON institution_news(institution_id, created_at DESC)
    WHERE is_active = true;
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,

    name TEXT NOT NULL,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,

    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    role TEXT NOT NULL DEFAULT 'org_employee',

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT unique_user_email_per_institution UNIQUE (institution_id, email)
);

CREATE INDEX idx_users_email ON users(email);
";

const BUTTERFLY_SPECIES_SQL: &str = r"
CREATE TABLE butterfly_species (
    id BIGSERIAL PRIMARY KEY,

    scientific_name TEXT NOT NULL UNIQUE,
    common_name TEXT NOT NULL,

    family TEXT NOT NULL,
    sub_family TEXT NOT NULL,

    lifespan_days INTEGER NOT NULL,

    range TEXT[] NOT NULL,

    host_plant TEXT,
    habitat TEXT,
    fun_facts TEXT,

    img_wings_open TEXT,
    img_wings_closed TEXT,
    extra_img_1 TEXT,
    extra_img_2 TEXT,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_lifespan_days CHECK (lifespan_days > 0)
);

CREATE INDEX idx_butterfly_species_common_name ON butterfly_species(common_name);
";

const BUTTERFLY_SPECIES_INSTITUTION_SQL: &str = r"
CREATE TABLE butterfly_species_institution (
    id BIGSERIAL PRIMARY KEY,

    butterfly_species_id BIGINT NOT NULL REFERENCES butterfly_species(id) ON DELETE RESTRICT,
    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    common_name_override TEXT,
    fun_facts_override TEXT,
    habitat_override TEXT,
    host_plant_override TEXT,
    image_override TEXT,
    lifespan_override INTEGER,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT unique_institution_species UNIQUE (butterfly_species_id, institution_id)
);

CREATE INDEX idx_species_institution ON butterfly_species_institution(institution_id);
";

const SUPPLIERS_SQL: &str = r"
CREATE TABLE suppliers (
    id BIGSERIAL PRIMARY KEY,

    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    name TEXT NOT NULL,
    code TEXT NOT NULL,

    country TEXT NOT NULL,
    website_url TEXT,

    is_active BOOLEAN NOT NULL DEFAULT true,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Two institutions can share the same code without collision; uniqueness is tenant-scoped
    CONSTRAINT unique_supplier_per_institution UNIQUE (institution_id, code),

    -- Needed for composite foreign keys that reference (institution_id, id)
    CONSTRAINT unique_supplier_id_per_institution UNIQUE (institution_id, id)
);

CREATE INDEX idx_suppliers_institution ON suppliers(institution_id) WHERE is_active = true;
";

const SHIPMENTS_SQL: &str = r"
CREATE TABLE shipments (
    id BIGSERIAL PRIMARY KEY,

    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    supplier_code TEXT NOT NULL,

    shipment_date TIMESTAMPTZ NOT NULL,
    arrival_date TIMESTAMPTZ NOT NULL,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Tenant enforcement: supplier_code must exist for the same institution
    CONSTRAINT fk_shipments_supplier_code
        FOREIGN KEY (institution_id, supplier_code)
        REFERENCES suppliers (institution_id, code)
        ON DELETE RESTRICT,

    -- Needed for composite foreign keys that reference (institution_id, id)
    CONSTRAINT unique_shipment_id_per_institution UNIQUE (institution_id, id)
);

CREATE INDEX idx_shipments_institution_date ON shipments(institution_id, arrival_date DESC);
";

const SHIPMENT_ITEMS_SQL: &str = r"
CREATE TABLE shipment_items (
    id BIGSERIAL PRIMARY KEY,

    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    shipment_id BIGINT NOT NULL,

    butterfly_species_id BIGINT NOT NULL REFERENCES butterfly_species(id) ON DELETE RESTRICT,

    number_received INTEGER NOT NULL,

    emerged_in_transit INTEGER NOT NULL DEFAULT 0,
    damaged_in_transit INTEGER NOT NULL DEFAULT 0,
    diseased_in_transit INTEGER NOT NULL DEFAULT 0,
    parasite INTEGER NOT NULL DEFAULT 0,
    non_emergence INTEGER NOT NULL DEFAULT 0,
    poor_emergence INTEGER NOT NULL DEFAULT 0,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT unique_shipment_species UNIQUE (shipment_id, butterfly_species_id),

    -- Needed so other tables can reference (institution_id, id)
    CONSTRAINT unique_shipment_item_id_per_institution UNIQUE (institution_id, id),

    -- Tenant enforcement: item must belong to a shipment in the same tenant
    CONSTRAINT fk_shipment_items_shipment_institution
        FOREIGN KEY (institution_id, shipment_id)
        REFERENCES shipments (institution_id, id)
        ON DELETE CASCADE,

    CONSTRAINT chk_number_received CHECK (number_received >= 0),
    CONSTRAINT chk_emerged_in_transit CHECK (emerged_in_transit >= 0),
    CONSTRAINT chk_damaged_in_transit CHECK (damaged_in_transit >= 0),
    CONSTRAINT chk_diseased_in_transit CHECK (diseased_in_transit >= 0),
    CONSTRAINT chk_parasite CHECK (parasite >= 0),
    CONSTRAINT chk_non_emergence CHECK (non_emergence >= 0),
    CONSTRAINT chk_poor_emergence CHECK (poor_emergence >= 0)
);

CREATE INDEX idx_shipment_items_shipment ON shipment_items(shipment_id);
CREATE INDEX idx_shipment_items_species ON shipment_items(butterfly_species_id);
";

const RELEASE_EVENTS_SQL: &str = r"
CREATE TABLE release_events (
    id BIGSERIAL PRIMARY KEY,

    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    shipment_id BIGINT NOT NULL,

    release_date TIMESTAMPTZ NOT NULL,
    released_by TEXT NOT NULL,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Tenant enforcement: the released shipment must belong to the same tenant
    CONSTRAINT fk_release_events_shipment_institution
        FOREIGN KEY (institution_id, shipment_id)
        REFERENCES shipments (institution_id, id)
        ON DELETE CASCADE,

    -- Needed so release_items can reference (institution_id, id)
    CONSTRAINT unique_release_event_id_per_institution UNIQUE (institution_id, id)
);

CREATE INDEX idx_release_events_institution_date ON release_events(institution_id, release_date DESC);
";

const RELEASE_ITEMS_SQL: &str = r"
CREATE TABLE release_items (
    id BIGSERIAL PRIMARY KEY,

    institution_id BIGINT NOT NULL REFERENCES institutions(id) ON DELETE CASCADE,

    release_event_id BIGINT NOT NULL,
    shipment_item_id BIGINT NOT NULL,

    quantity INTEGER NOT NULL,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT unique_release_shipment_item UNIQUE (release_event_id, shipment_item_id),

    -- release_item must belong to the same tenant as its release_event
    CONSTRAINT fk_release_items_event_institution
        FOREIGN KEY (institution_id, release_event_id)
        REFERENCES release_events (institution_id, id)
        ON DELETE CASCADE,

    -- release_item must belong to the same tenant as its shipment_item
    CONSTRAINT fk_release_items_shipment_item_institution
        FOREIGN KEY (institution_id, shipment_item_id)
        REFERENCES shipment_items (institution_id, id)
        ON DELETE RESTRICT,

    CONSTRAINT chk_release_quantity CHECK (quantity > 0)
);

CREATE INDEX idx_release_items_event ON release_items(release_event_id);
CREATE INDEX idx_release_items_shipment_item ON release_items(shipment_item_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS release_items;
DROP TABLE IF EXISTS release_events;
DROP TABLE IF EXISTS shipment_items;
DROP TABLE IF EXISTS shipments;
DROP TABLE IF EXISTS suppliers;
DROP TABLE IF EXISTS butterfly_species_institution;
DROP TABLE IF EXISTS butterfly_species;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS institution_news;
DROP TABLE IF EXISTS institutions;
";
