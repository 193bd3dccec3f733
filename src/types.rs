//! Common types used throughout syncform
//!
//! This module contains the closed key enumerations that classify
//! capability axes.

use crate::error::Error;
use serde::{Deserialize, Serialize};

// ============================================================================
// Closed Key Enumerations
// ============================================================================

/// Declares a closed key enum with a stable wire name per variant.
///
/// Generates `ALL`, `as_str`, `Display` and `FromStr`.
macro_rules! closed_key {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Every key of this axis, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Stable wire name
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_uppercase().as_str() {
                    $( $wire => Ok($name::$variant), )+
                    _ => Err(Error::config(format!(
                        "Unknown {}: {s}",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

closed_key! {
    /// Supported data warehouses
    pub enum WarehouseType {
        Redshift => "REDSHIFT",
        Snowflake => "SNOWFLAKE",
        Bigquery => "BIGQUERY",
        Postgres => "POSTGRES",
    }
}

closed_key! {
    /// Supported external applications (sync destinations)
    pub enum ExternalAppType {
        Salesforce => "SALESFORCE",
        Hubspot => "HUBSPOT",
        Intercom => "INTERCOM",
        GoogleAds => "GOOGLEADS",
        Mailchimp => "MAILCHIMP",
        Sendgrid => "SENDGRID",
        ActiveCampaign => "ACTIVECAMPAIGN",
        Marketo => "MARKETO",
        Kafka => "KAFKA",
        CustomerIo => "CUSTOMERIO",
        GooglePubSub => "GOOGLEPUBSUB",
        Mixpanel => "MIXPANEL",
        GoogleSheets => "GOOGLE_SHEETS",
        RestApi => "RESTAPI",
    }
}

closed_key! {
    /// JDBC dialects with dedicated query helpers
    pub enum JdbcConnectionType {
        Redshift => "REDSHIFT",
        Snowflake => "SNOWFLAKE",
        Postgres => "POSTGRES",
    }
}

closed_key! {
    /// Intercom's contact taxonomy, one data sink per object
    pub enum IntercomObject {
        Company => "COMPANY",
        Contact => "CONTACT",
        /// Contact with role `user`
        User => "USER",
        /// Contact with role `lead`
        Lead => "LEAD",
    }
}

closed_key! {
    /// How records are written into the destination app
    pub enum AppSyncMode {
        /// Create new records only
        Insert => "INSERT",
        /// Update existing records only
        Update => "UPDATE",
        /// Update when present, insert otherwise
        Upsert => "UPSERT",
    }
}

impl AppSyncMode {
    /// Human-readable label for option lists
    pub fn title(self) -> &'static str {
        match self {
            AppSyncMode::Insert => "Insert",
            AppSyncMode::Update => "Update",
            AppSyncMode::Upsert => "Upsert",
        }
    }
}
