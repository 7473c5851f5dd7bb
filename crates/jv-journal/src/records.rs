use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JournalError;
use crate::revision::RevisionRecord;

/// Table a streamed revision belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub table_id: String,
    pub table_name: String,
}

/// A revision as delivered by a change stream, tagged with its table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionDetailsRecord {
    pub table_info: TableInfo,
    pub revision: RevisionRecord,
}

impl RevisionDetailsRecord {
    /// Typed view of the revision data.
    ///
    /// `None` for system revisions and for deleted documents, which carry
    /// no data.
    pub fn table_record(&self) -> Result<Option<TableRecord>, JournalError> {
        match &self.revision {
            RevisionRecord::User(user) => match &user.data {
                Some(data) => TableRecord::decode(&self.table_info.table_name, data).map(Some),
                None => Ok(None),
            },
            RevisionRecord::System { .. } => Ok(None),
        }
    }
}

/// Document data of the known tables.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableRecord {
    Person(Person),
    Vehicle(Vehicle),
    DriversLicense(DriversLicense),
    VehicleRegistration(VehicleRegistration),
}

impl TableRecord {
    pub const PERSON: &'static str = "Person";
    pub const VEHICLE: &'static str = "Vehicle";
    pub const DRIVERS_LICENSE: &'static str = "DriversLicense";
    pub const VEHICLE_REGISTRATION: &'static str = "VehicleRegistration";

    /// Decode `data` as a record of `table_name`.
    pub fn decode(table_name: &str, data: &Value) -> Result<Self, JournalError> {
        let decode_err = |e: serde_json::Error| {
            JournalError::Decode(format!("{table_name} record: {e}"))
        };
        match table_name {
            Self::PERSON => Person::deserialize(data).map(Self::Person).map_err(decode_err),
            Self::VEHICLE => Vehicle::deserialize(data).map(Self::Vehicle).map_err(decode_err),
            Self::DRIVERS_LICENSE => DriversLicense::deserialize(data)
                .map(Self::DriversLicense)
                .map_err(decode_err),
            Self::VEHICLE_REGISTRATION => VehicleRegistration::deserialize(data)
                .map(Self::VehicleRegistration)
                .map_err(decode_err),
            other => Err(JournalError::UnsupportedTable {
                table: other.to_string(),
            }),
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Person(_) => Self::PERSON,
            Self::Vehicle(_) => Self::VEHICLE,
            Self::DriversLicense(_) => Self::DRIVERS_LICENSE,
            Self::VehicleRegistration(_) => Self::VEHICLE_REGISTRATION,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "DOB")]
    pub dob: NaiveDate,
    pub gov_id: String,
    pub gov_id_type: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vehicle {
    #[serde(rename = "VIN")]
    pub vin: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub year: u16,
    pub make: String,
    pub model: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DriversLicense {
    pub person_id: String,
    pub license_number: String,
    pub license_type: String,
    pub valid_from_date: NaiveDate,
    pub valid_to_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleRegistration {
    #[serde(rename = "VIN")]
    pub vin: String,
    pub license_plate_number: String,
    pub state: String,
    pub city: String,
    pub pending_penalty_ticket_amount: f64,
    pub valid_from_date: NaiveDate,
    pub valid_to_date: NaiveDate,
    pub owners: Owners,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Owners {
    pub primary_owner: Owner,
    #[serde(default)]
    pub secondary_owners: Vec<Owner>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Owner {
    pub person_id: String,
}
