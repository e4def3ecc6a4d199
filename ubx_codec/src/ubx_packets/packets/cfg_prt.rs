use alloc::vec;
use bitflags::bitflags;

use crate::{
    error::FieldError,
    field::ubx_getters,
    message::{ubx_message, ProtocolVersions},
};

mod layout {
    use crate::field::{BitField, Field};

    pub const PORT_ID: Field<u8> = Field::at(0);
    pub const TX_READY_EN: BitField<u16> = BitField::new(2, 0x0001);
    pub const TX_READY_POL: BitField<u16> = BitField::new(2, 0x0002);
    pub const TX_READY_PIN: BitField<u16> = BitField::new(2, 0x007c);
    pub const TX_READY_THRES: BitField<u16> = BitField::new(2, 0xff80);
    pub const MODE_CHAR_LEN: BitField<u32> = BitField::new(4, 0x0000_00c0);
    pub const MODE_PARITY: BitField<u32> = BitField::new(4, 0x0000_0e00);
    pub const MODE_STOP_BITS: BitField<u32> = BitField::new(4, 0x0000_3000);
    pub const BAUD_RATE: Field<u32> = Field::at(8);
    pub const IN_PROTO_MASK: Field<u16> = Field::at(12);
    pub const OUT_PROTO_MASK: Field<u16> = Field::at(14);
    pub const FLAGS: Field<u16> = Field::at(16);
    // 2 reserved bytes
    pub const LEN: usize = 20;
}

ubx_message! {
    /// Port Configuration for UART
    CfgPrtUart {
        class: 0x06,
        id: 0x00,
        name: "CFG-PRT",
        fixed_payload_len: Some(20),
        protocol: ProtocolVersions::ANY,
    }
}

impl CfgPrtUart {
    ubx_getters! {
        baud_rate: u32 = layout::BAUD_RATE;
    }

    /// TX ready pin configuration
    pub fn tx_ready(&self) -> Result<TxReady, FieldError> {
        let payload = self.payload();
        Ok(TxReady {
            enabled: layout::TX_READY_EN.read(payload)? != 0,
            polarity: if layout::TX_READY_POL.read(payload)? == 0 {
                TxReadyPolarity::HighActive
            } else {
                TxReadyPolarity::LowActive
            },
            pin: layout::TX_READY_PIN.read(payload)? as u8,
            threshold: layout::TX_READY_THRES.read(payload)?,
        })
    }

    pub fn port_id(&self) -> Result<UartPortId, FieldError> {
        UartPortId::try_from(layout::PORT_ID.read(self.payload())?)
    }

    pub fn mode(&self) -> Result<UartMode, FieldError> {
        let payload = self.payload();
        Ok(UartMode {
            data_bits: DataBits::try_from(layout::MODE_CHAR_LEN.read(payload)?)?,
            parity: Parity::try_from(layout::MODE_PARITY.read(payload)?)?,
            stop_bits: StopBits::from_raw(layout::MODE_STOP_BITS.read(payload)?),
        })
    }

    pub fn in_proto_mask(&self) -> Result<InProtoMask, FieldError> {
        layout::IN_PROTO_MASK
            .read(self.payload())
            .map(InProtoMask::from_bits_retain)
    }

    pub fn out_proto_mask(&self) -> Result<OutProtoMask, FieldError> {
        layout::OUT_PROTO_MASK
            .read(self.payload())
            .map(OutProtoMask::from_bits_retain)
    }

    pub fn flags(&self) -> Result<PortFlags, FieldError> {
        layout::FLAGS
            .read(self.payload())
            .map(PortFlags::from_bits_retain)
    }
}

/// Parameters of [`CfgPrtUart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgPrtUartBuilder {
    /// UART port number, 1 or 2
    pub port_id: u8,
    pub tx_ready: TxReady,
    pub mode: UartMode,
    pub baud_rate: u32,
    pub in_proto_mask: InProtoMask,
    pub out_proto_mask: OutProtoMask,
    pub flags: PortFlags,
}

impl Default for CfgPrtUartBuilder {
    /// UART1, 9600 8N1, UBX and NMEA in and out
    fn default() -> Self {
        Self {
            port_id: UartPortId::Uart1 as u8,
            tx_ready: TxReady::default(),
            mode: UartMode::new(DataBits::Eight, Parity::None, StopBits::One),
            baud_rate: 9600,
            in_proto_mask: InProtoMask::UBLOX | InProtoMask::NMEA,
            out_proto_mask: OutProtoMask::UBLOX | OutProtoMask::NMEA,
            flags: PortFlags::empty(),
        }
    }
}

impl CfgPrtUartBuilder {
    pub fn build(&self) -> Result<CfgPrtUart, FieldError> {
        let port_id = UartPortId::try_from(self.port_id)?;
        if self.baud_rate == 0 {
            return Err(FieldError::invalid("baud_rate", "must not be zero"));
        }

        let tx_ready = self.tx_ready;
        if u16::from(tx_ready.pin) > layout::TX_READY_PIN.max_value() {
            return Err(FieldError::invalid("tx_ready.pin", "PIO number must be below 32"));
        }
        if tx_ready.threshold > layout::TX_READY_THRES.max_value() {
            return Err(FieldError::invalid("tx_ready.threshold", "must fit into 9 bits"));
        }

        let mut payload = vec![0u8; layout::LEN];
        layout::PORT_ID.write(&mut payload, port_id as u8)?;
        layout::TX_READY_EN.write(&mut payload, u16::from(tx_ready.enabled))?;
        layout::TX_READY_POL.write(&mut payload, tx_ready.polarity as u16)?;
        layout::TX_READY_PIN.write(&mut payload, u16::from(tx_ready.pin))?;
        layout::TX_READY_THRES.write(&mut payload, tx_ready.threshold)?;
        layout::MODE_CHAR_LEN.write(&mut payload, self.mode.data_bits.into_raw())?;
        layout::MODE_PARITY.write(&mut payload, self.mode.parity.into_raw())?;
        layout::MODE_STOP_BITS.write(&mut payload, self.mode.stop_bits.into_raw())?;
        layout::BAUD_RATE.write(&mut payload, self.baud_rate)?;
        layout::IN_PROTO_MASK.write(&mut payload, self.in_proto_mask.bits())?;
        layout::OUT_PROTO_MASK.write(&mut payload, self.out_proto_mask.bits())?;
        layout::FLAGS.write(&mut payload, self.flags.bits())?;
        Ok(CfgPrtUart::from_payload(payload))
    }
}

/// Port Identifier Number (= 1 or 2 for UART ports)
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UartPortId {
    Uart1 = 1,
    Uart2 = 2,
}

impl TryFrom<u8> for UartPortId {
    type Error = FieldError;

    fn try_from(raw: u8) -> Result<Self, FieldError> {
        match raw {
            1 => Ok(Self::Uart1),
            2 => Ok(Self::Uart2),
            _ => Err(FieldError::invalid("port_id", "UART port id must be 1 or 2")),
        }
    }
}

/// TX ready output: a PIO that signals pending data in the TX buffer
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxReady {
    pub enabled: bool,
    pub polarity: TxReadyPolarity,
    /// PIO number, 0..=31
    pub pin: u8,
    /// Bytes pending before the pin is asserted, in units of 8 bytes (9 bits)
    pub threshold: u16,
}

#[repr(u16)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TxReadyPolarity {
    #[default]
    HighActive = 0,
    LowActive = 1,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UartMode {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl UartMode {
    pub const fn new(data_bits: DataBits, parity: Parity, stop_bits: StopBits) -> Self {
        Self {
            data_bits,
            parity,
            stop_bits,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
}

impl DataBits {
    const fn into_raw(self) -> u32 {
        match self {
            Self::Seven => 0b10,
            Self::Eight => 0b11,
        }
    }
}

impl TryFrom<u32> for DataBits {
    type Error = FieldError;

    fn try_from(raw: u32) -> Result<Self, FieldError> {
        match raw {
            0b10 => Ok(Self::Seven),
            0b11 => Ok(Self::Eight),
            _ => Err(FieldError::invalid("char_len", "5 and 6 bit characters are not supported")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    Even,
    Odd,
    None,
}

impl Parity {
    const fn into_raw(self) -> u32 {
        match self {
            Self::Even => 0b000,
            Self::Odd => 0b001,
            Self::None => 0b100,
        }
    }
}

impl TryFrom<u32> for Parity {
    type Error = FieldError;

    fn try_from(raw: u32) -> Result<Self, FieldError> {
        match raw {
            0b000 => Ok(Self::Even),
            0b001 => Ok(Self::Odd),
            0b100 | 0b101 => Ok(Self::None),
            _ => Err(FieldError::invalid("parity", "reserved value")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    One,
    OneHalf,
    Two,
    Half,
}

impl StopBits {
    const fn into_raw(self) -> u32 {
        match self {
            Self::One => 0b00,
            Self::OneHalf => 0b01,
            Self::Two => 0b10,
            Self::Half => 0b11,
        }
    }

    /// `raw` comes from a two bit field, every value is defined
    fn from_raw(raw: u32) -> Self {
        match raw & 0b11 {
            0b00 => Self::One,
            0b01 => Self::OneHalf,
            0b10 => Self::Two,
            _ => Self::Half,
        }
    }
}

bitflags! {
    /// A mask describing which input protocols are active.
    /// Several protocols can be enabled on a single port.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct InProtoMask: u16 {
        const UBLOX = 1;
        const NMEA = 2;
        const RTCM = 4;
        /// Not supported in protocol versions less than 20
        const RTCM3 = 0x20;
    }
}

bitflags! {
    /// A mask describing which output protocols are active
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct OutProtoMask: u16 {
        const UBLOX = 1;
        const NMEA = 2;
        /// Not supported in protocol versions less than 20
        const RTCM3 = 0x20;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PortFlags: u16 {
        /// Extended TX timeout: the port waits for the 'TX buffer full' condition
        /// to clear for 1.5 s instead of discarding data
        const EXTENDED_TX_TIMEOUT = 0x02;
    }
}
