//! Class/id dispatch from a validated frame to a typed message.
//!
//! The dispatch table is a sorted static slice of plain function pointers,
//! built at compile time and never mutated. Lookups are a binary search on
//! `(class, id)`. Pairs without a decoder are not an error: they come back as
//! [`Message::Unknown`].

use alloc::vec::Vec;
use tracing::trace;

use crate::{
    error::FrameError,
    message::{GenericMessage, UbxPacketMeta},
    ubx_packets::packets::*,
};

/// One row of the dispatch table
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    pub class: u8,
    pub id: u8,
    pub name: &'static str,
    pub construct: fn(Vec<u8>) -> Message,
}

impl RegistryEntry {
    /// Row for message type `T`, keyed by its class, id and name
    pub const fn of<T: UbxPacketMeta>(construct: fn(Vec<u8>) -> Message) -> Self {
        Self {
            class: T::CLASS,
            id: T::ID,
            name: T::NAME,
            construct,
        }
    }

    const fn key(&self) -> (u8, u8) {
        (self.class, self.id)
    }
}

macro_rules! define_messages {
    ($($variant:ident),* $(,)?) => {
        /// A decoded message: one of the typed catalog entries, or the
        /// untyped fallback
        #[derive(Debug, Clone, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum Message {
            $($variant($variant),)*
            Unknown(GenericMessage),
        }

        impl Message {
            pub fn class(&self) -> u8 {
                match self {
                    $(Self::$variant(_) => <$variant as UbxPacketMeta>::CLASS,)*
                    Self::Unknown(msg) => msg.class,
                }
            }

            pub fn id(&self) -> u8 {
                match self {
                    $(Self::$variant(_) => <$variant as UbxPacketMeta>::ID,)*
                    Self::Unknown(msg) => msg.id,
                }
            }

            /// Documented name of the message type, `None` for unknown pairs
            pub fn name(&self) -> Option<&'static str> {
                match self {
                    $(Self::$variant(_) => Some(<$variant as UbxPacketMeta>::NAME),)*
                    Self::Unknown(_) => None,
                }
            }

            pub fn payload(&self) -> &[u8] {
                match self {
                    $(Self::$variant(msg) => msg.payload(),)*
                    Self::Unknown(msg) => &msg.payload,
                }
            }

            /// Serialize as a complete frame
            pub fn into_frame(self) -> Result<Vec<u8>, FrameError> {
                match self {
                    $(Self::$variant(msg) => msg.into_frame(),)*
                    Self::Unknown(msg) => msg.into_frame(),
                }
            }
        }

        $(
            impl From<$variant> for Message {
                fn from(msg: $variant) -> Self {
                    Self::$variant(msg)
                }
            }
        )*

        static STANDARD_TABLE: &[RegistryEntry] = &[
            $(RegistryEntry::of::<$variant>(|payload| Message::$variant($variant::from_payload(payload))),)*
        ];
    };
}

// Listed in ascending (class, id) order, lookups rely on it
define_messages! {
    NavPosLlh,
    NavStatus,
    NavDop,
    NavPvt,
    NavSvInfo,
    NavSat,
    AckNak,
    AckAck,
    CfgPrtUart,
    CfgMsg,
    CfgRst,
    CfgRate,
    CfgAnt,
    CfgNav5,
    MonVer,
}

impl From<GenericMessage> for Message {
    fn from(msg: GenericMessage) -> Self {
        Self::Unknown(msg)
    }
}

/// Read-only `(class, id)` to constructor table
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    table: &'static [RegistryEntry],
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    /// Every message type of this crate
    pub const fn standard() -> Self {
        Self {
            table: STANDARD_TABLE,
        }
    }

    /// Dispatch through a caller supplied table, for example to decode only
    /// a subset of the catalog. `table` must be sorted by `(class, id)`
    /// without duplicates, otherwise lookups may miss entries.
    pub const fn new(table: &'static [RegistryEntry]) -> Self {
        Self { table }
    }

    pub fn entries(&self) -> &'static [RegistryEntry] {
        self.table
    }

    pub fn lookup(&self, class: u8, id: u8) -> Option<&'static RegistryEntry> {
        self.table
            .binary_search_by_key(&(class, id), RegistryEntry::key)
            .ok()
            .map(|idx| &self.table[idx])
    }

    pub fn is_known(&self, class: u8, id: u8) -> bool {
        self.lookup(class, id).is_some()
    }

    /// Wrap `payload` in the message type registered for `(class, id)`.
    ///
    /// Never fails: unregistered pairs yield [`Message::Unknown`] carrying the
    /// same class, id and payload.
    pub fn construct(&self, class: u8, id: u8, payload: Vec<u8>) -> Message {
        match self.lookup(class, id) {
            Some(entry) => (entry.construct)(payload),
            None => {
                trace!(class, id, len = payload.len(), "no decoder registered, generic message");
                Message::Unknown(GenericMessage { class, id, payload })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn standard_table_is_sorted_and_unique() {
        let table = Registry::standard().entries();
        assert_eq!(table.len(), 15);
        assert!(table.windows(2).all(|w| w[0].key() < w[1].key()));
    }

    #[test]
    fn every_entry_constructs_its_own_type() {
        let registry = Registry::standard();
        for entry in registry.entries() {
            let msg = registry.construct(entry.class, entry.id, vec![1, 2, 3]);
            assert_eq!((msg.class(), msg.id()), (entry.class, entry.id));
            assert_eq!(msg.name(), Some(entry.name));
            assert_eq!(msg.payload(), &[1, 2, 3]);
            assert!(!matches!(msg, Message::Unknown(_)), "{}", entry.name);
        }
    }

    #[test]
    fn dispatches_to_typed_messages() {
        let registry = Registry::standard();
        assert!(matches!(
            registry.construct(0x01, 0x35, vec![0; 8]),
            Message::NavSat(_)
        ));
        assert!(matches!(
            registry.construct(0x01, 0x30, vec![0; 8]),
            Message::NavSvInfo(_)
        ));
        assert!(matches!(
            registry.construct(0x06, 0x04, vec![0; 4]),
            Message::CfgRst(_)
        ));
        let lookup = registry.lookup(0x0a, 0x04).unwrap();
        assert_eq!(lookup.name, "MON-VER");
    }

    #[test]
    fn unknown_pair_falls_back_to_generic() {
        let registry = Registry::standard();
        for (class, id) in [(0x01, 0x99), (0xff, 0xff), (0x00, 0x00), (0x06, 0x02)] {
            assert!(!registry.is_known(class, id));
            let msg = registry.construct(class, id, vec![7; 5]);
            assert_eq!(
                msg,
                Message::Unknown(GenericMessage {
                    class,
                    id,
                    payload: vec![7; 5]
                })
            );
            assert_eq!(msg.name(), None);
        }
    }

    #[test]
    fn custom_table() {
        static ACK_ONLY: &[RegistryEntry] = &[
            RegistryEntry::of::<AckNak>(|p| AckNak::from_payload(p).into()),
            RegistryEntry::of::<AckAck>(|p| AckAck::from_payload(p).into()),
        ];
        let registry = Registry::new(ACK_ONLY);
        assert!(matches!(
            registry.construct(0x05, 0x01, vec![0x06, 0x04]),
            Message::AckAck(_)
        ));
        assert!(matches!(
            registry.construct(0x01, 0x07, vec![]),
            Message::Unknown(_)
        ));
    }

    #[test]
    fn message_into_frame() {
        let msg = Message::from(GenericMessage {
            class: 0x0a,
            id: 0x04,
            payload: vec![],
        });
        assert_eq!(
            msg.into_frame().unwrap(),
            [0xb5, 0x62, 0x0a, 0x04, 0x00, 0x00, 0x0e, 0x34]
        );
    }
}
