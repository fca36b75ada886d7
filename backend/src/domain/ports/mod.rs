//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`PoiCommand`], [`PoiQuery`]) are what inbound adapters
//! call. The driven port ([`PoiStore`]) is what outbound adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod poi_command;
mod poi_query;
mod poi_store;

#[cfg(test)]
pub use poi_command::MockPoiCommand;
pub use poi_command::{
    CreatePoiRequest, CreatePoiResponse, DeletePoiRequest, FixturePoiCommand, PoiCommand,
    PoiCreatePayload, position_missing,
};
#[cfg(test)]
pub use poi_query::MockPoiQuery;
pub use poi_query::{
    FixturePoiQuery, PoiQuery, PoiSearchDataPayload, PoisSearchDataPayload, SearchPoisRequest,
    SearchPoisResponse,
};
#[cfg(test)]
pub use poi_store::{MockPoiCursor, MockPoiStore, MockPoiUnitOfWork};
pub use poi_store::{
    CursorFilter, PoiCursor, PoiDocument, PoiStore, PoiStoreError, PoiUnitOfWork,
};
