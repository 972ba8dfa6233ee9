//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the repetitive trait implementations needed for
//! each domain record so that every list view can run the generic pipeline.

/// Define a closed status enumeration with exact wire values.
///
/// # Example
/// ```rust,ignore
/// status_enum!(PaymentStatus {
///     Paid => "Pago",
///     Pending => "Pendente",
/// });
///
/// assert_eq!(PaymentStatus::Paid.as_str(), "Pago");
/// assert_eq!(PaymentStatus::parse("Pendente"), Some(PaymentStatus::Pending));
/// ```
#[macro_export]
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $type:ident { $first:ident => $first_wire:literal $(, $variant:ident => $wire:literal )* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $type {
            #[default]
            #[serde(rename = $first_wire)]
            $first,
            $(
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        impl $type {
            /// Every status, in display order
            pub const ALL: &'static [$type] = &[$type::$first $(, $type::$variant)*];

            /// Exact wire value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $type::$first => $first_wire,
                    $( $type::$variant => $wire, )*
                }
            }

            /// Parse an exact (case-sensitive) wire value
            pub fn parse(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|s| s.as_str() == value)
            }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Complete macro to create a Data entity with automatic trait implementations
///
/// Injects: id, name, status, created_at, updated_at, followed by the
/// domain-specific fields. Every specific field is reachable through
/// `Data::field_value` under its own name.
///
/// # Example
///
/// ```rust,ignore
/// use imob::prelude::*;
///
/// status_enum!(ListingStatus { Open => "open", Closed => "closed" });
///
/// impl_data_entity!(
///     Listing,
///     "listing",
///     "listings",
///     ListingStatus,
///     ["name", "city"],
///     {
///         city: String,
///         price: f64,
///     }
/// );
///
/// let listing = Listing::new("Casa no Batel", ListingStatus::Open, "Curitiba".into(), 950_000.0);
/// ```
#[macro_export]
macro_rules! impl_data_entity {
    (
        $(#[$meta:meta])*
        $type:ident,
        $type_name:expr,
        $plural_name:expr,
        $status:ty,
        [ $( $search_field:expr ),* $(,)? ],
        {
            $( $(#[$field_meta:meta])* $specific_field:ident : $specific_type:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,

            /// Display name or title
            pub name: String,

            /// Current status of the entity
            pub status: $status,

            /// When this entity was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this entity was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,
            $(
                $(#[$field_meta])*
                pub $specific_field : $specific_type,
            )*
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural_name
            }

            fn resource_name_singular() -> &'static str {
                $type_name
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn status(&self) -> &str {
                self.status.as_str()
            }
        }

        impl $crate::core::entity::Data for $type {
            fn name(&self) -> &str {
                &self.name
            }

            fn search_fields() -> &'static [&'static str] {
                &[$($search_field),*]
            }

            fn filter_fields() -> &'static [&'static str] {
                &[$(stringify!($specific_field)),*]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::FieldValue;
                match field {
                    "id" => Some(FieldValue::from(self.id)),
                    "name" => Some(FieldValue::from(self.name.as_str())),
                    "status" => Some(FieldValue::from(self.status.as_str())),
                    "created_at" => Some(FieldValue::from(self.created_at)),
                    "updated_at" => Some(FieldValue::from(self.updated_at)),
                    $(
                        stringify!($specific_field) => Some(FieldValue::from(self.$specific_field.clone())),
                    )*
                    _ => None,
                }
            }
        }

        impl $type {
            /// Create a new entity with a fresh id and timestamps
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                name: impl Into<String>,
                status: $status,
                $( $specific_field: $specific_type ),*
            ) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    name: name.into(),
                    status,
                    created_at: now,
                    updated_at: now,
                    $( $specific_field ),*
                }
            }

            /// Update the modification timestamp
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }
    };
}
