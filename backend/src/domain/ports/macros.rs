//! `define_port_error!`: error enums for driven ports.
//!
//! Every variant carries a `message: String` and renders as
//! `"<summary>: <message>"`. A snake_case constructor taking
//! `impl Into<String>` is generated per variant, so adapters write
//! `PoiStoreError::connection("pool closed")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $summary:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error("{}: {}", $summary, .message)]
                $variant { message: String },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build a `", stringify!($variant), "` error.")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;
