//! Status enums reported by the payment processor.
//!
//! The processor owns these values; they are only ever read and displayed.
//! Values this crate does not know about are kept verbatim in `Other`, so a
//! new processor status neither fails the lookup nor loses its name on the
//! way back to the client.

use serde::{Deserialize, Serialize};

macro_rules! processor_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $wire:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)*
            /// A value this crate does not know, as sent.
            Other(String),
        }

        impl $name {
            /// Wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)*
                    Self::Other(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => Self::$variant,)*
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> Self {
                match status {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

processor_status! {
    /// Lifecycle status of a checkout session.
    CheckoutSessionStatus {
        /// The session is awaiting payment details.
        Open => "open",
        /// Payment was collected and the session is finished.
        Complete => "complete",
        /// The session expired before completion.
        Expired => "expired",
    }
}

processor_status! {
    /// Payment status of a checkout session.
    SessionPaymentStatus {
        Paid => "paid",
        Unpaid => "unpaid",
        NoPaymentRequired => "no_payment_required",
    }
}

processor_status! {
    /// Status of the payment intent behind a session.
    PaymentIntentStatus {
        RequiresPaymentMethod => "requires_payment_method",
        RequiresConfirmation => "requires_confirmation",
        RequiresAction => "requires_action",
        Processing => "processing",
        RequiresCapture => "requires_capture",
        Canceled => "canceled",
        Succeeded => "succeeded",
    }
}
