use core::{fmt, iter::FusedIterator, slice::ChunksExact};

use crate::{
    error::FieldError,
    field::{ubx_getters, Text},
    message::{ubx_message, ProtocolVersions},
};

/// Size of each extension string slot
pub const MON_VER_EXTENSION_LEN: usize = 30;

mod layout {
    use crate::field::Text;

    pub const SW_VERSION: Text = Text::new(0, 30);
    pub const HW_VERSION: Text = Text::new(30, 10);
    pub const EXTENSIONS_OFFSET: usize = 40;
}

ubx_message! {
    /// Receiver/Software Version
    MonVer {
        class: 0x0a,
        id: 0x04,
        name: "MON-VER",
        fixed_payload_len: None,
        protocol: ProtocolVersions::ANY,
    }
}

impl MonVer {
    ubx_getters! {
        /// Zero-terminated software version string
        software_version: &str = layout::SW_VERSION;
        /// Zero-terminated hardware version string
        hardware_version: &str = layout::HW_VERSION;
    }

    /// Extended software information strings, e.g. `PROTVER=18.00`.
    ///
    /// A trailing partial slot is ignored.
    pub fn extensions(&self) -> MonVerExtensionIter<'_> {
        let tail = self
            .payload()
            .get(layout::EXTENSIONS_OFFSET..)
            .unwrap_or_default();
        MonVerExtensionIter {
            chunks: tail.chunks_exact(MON_VER_EXTENSION_LEN),
        }
    }

    /// Protocol version announced by the `PROTVER` extension
    pub fn protocol_version(&self) -> Option<&str> {
        self.extensions().find_map(|ext| {
            ext.ok()
                .and_then(|ext| ext.strip_prefix("PROTVER").map(str::trim_start))
                .and_then(|rest| rest.strip_prefix(['=', ' ']))
        })
    }
}

#[derive(Clone)]
pub struct MonVerExtensionIter<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl<'a> Iterator for MonVerExtensionIter<'a> {
    type Item = Result<&'a str, FieldError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .map(|slot| Text::new(0, MON_VER_EXTENSION_LEN).read(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for MonVerExtensionIter<'_> {}
impl FusedIterator for MonVerExtensionIter<'_> {}

impl fmt::Debug for MonVerExtensionIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
