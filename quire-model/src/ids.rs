use uuid::Uuid;

use crate::error::ModelError;

macro_rules! typed_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                $name(Uuid::now_v7())
            }

            pub fn from_string(id: &str) -> Result<Self, ModelError> {
                id.parse()
                    .map($name)
                    .map_err(|_| ModelError::InvalidId(id.to_string()))
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(
    /// Strongly typed ID for libraries
    LibraryId
);
typed_id!(
    /// Strongly typed ID for series
    SeriesId
);
typed_id!(
    /// Strongly typed ID for books
    BookId
);
typed_id!(
    /// Strongly typed ID for users
    UserId
);
typed_id!(
    /// Strongly typed ID for series thumbnails
    ThumbnailId
);
typed_id!(
    /// Strongly typed ID for collections
    CollectionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        let id = SeriesId::new();
        let parsed = SeriesId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(BookId::from_string("not-a-uuid").is_err());
    }
}
