pub mod ack;
pub mod cfg_ant;
pub mod cfg_msg;
pub mod cfg_nav5;
pub mod cfg_prt;
pub mod cfg_rate;
pub mod cfg_rst;
pub mod mon_ver;
pub mod nav_dop;
pub mod nav_pos_llh;
pub mod nav_pvt;
pub mod nav_sat;
pub mod nav_status;
pub mod nav_svinfo;
pub mod satellite;

pub use ack::{AckAck, AckBuilder, AckNak};
pub use cfg_ant::{AntFlags, AntPins, CfgAnt, CfgAntBuilder};
pub use cfg_msg::{CfgMsg, CfgMsgBuilder, CfgMsgRates};
pub use cfg_nav5::{
    CfgNav5, CfgNav5Builder, CfgNav5Params, NavDynamicModel, NavFixMode, UtcStandardIdentifier,
};
pub use cfg_prt::{
    CfgPrtUart, CfgPrtUartBuilder, DataBits, InProtoMask, OutProtoMask, Parity, PortFlags,
    StopBits, TxReady, TxReadyPolarity, UartMode, UartPortId,
};
pub use cfg_rate::{AlignmentToReferenceTime, CfgRate, CfgRateBuilder};
pub use cfg_rst::{CfgRst, CfgRstBuilder, NavBbrMask, NavBbrPredefinedMask, ResetMode};
pub use mon_ver::{MonVer, MonVerExtensionIter};
pub use nav_dop::NavDop;
pub use nav_pos_llh::NavPosLlh;
pub use nav_pvt::{NavPvt, NavPvtFlags, NavPvtFlags2, NavPvtValidFlags};
pub use nav_sat::NavSat;
pub use nav_status::{GpsFix, MapMatchingStatus, NavStatus, NavStatusFlags};
pub use nav_svinfo::{ChipGeneration, NavSvInfo};
pub use satellite::{
    OrbitSource, SatelliteData, SatelliteIter, SatelliteSource, SignalQuality, SvHealth,
};
