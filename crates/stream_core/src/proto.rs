//! Esquema protobuf do streaming AOS.
//!
//! Mensagens declaradas à mão com os derives do `prost` (sem build script),
//! mais a tabela de descritores de cada registro para o [`flatten`](crate::flatten).
//!
//! ```text
//! AosMessage
//! ├── origin_name: string            "<device_key>[::<interface>]"
//! ├── timestamp:   uint64 (opcional) epoch em segundos
//! └── oneof data
//!     ├── perf_mon: PerfMonData      contadores de interface / recursos
//!     ├── event:    AosEvent         oneof com 10 tipos de evento
//!     └── alert:    AosAlert         severity + raised + oneof com 17 tipos
//! ```

use crate::flatten::SymbolicEnum;
use crate::impl_record;

/// Declara um enum protobuf com nome simbólico por variante.
macro_rules! proto_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal => $symbol:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            /// Nome simbólico, como declarado no `.proto`.
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $symbol),+
                }
            }
        }

        impl SymbolicEnum for $name {
            fn name_of(value: i32) -> &'static str {
                Self::try_from(value)
                    .map(|e| e.as_str_name())
                    .unwrap_or(crate::flatten::UNKNOWN_ENUM)
            }
        }
    };
}

// ──────────────────────────────────────────────
// Enums
// ──────────────────────────────────────────────

proto_enum!(
    /// Severidade de um alerta.
    AlertSeverity {
        Critical = 1 => "critical",
        Major = 2 => "major",
        Minor = 3 => "minor",
        Warning = 4 => "warning",
        Info = 5 => "info",
    }
);

proto_enum!(
    /// Estado de um device gerenciado.
    DeviceStatus {
        Up = 1 => "up",
        Down = 2 => "down",
        Missing = 3 => "missing",
    }
);

proto_enum!(
    StreamingStatus {
        Connected = 1 => "connected",
        Disconnected = 2 => "disconnected",
    }
);

proto_enum!(
    /// Estado operacional de link (interface, membro de LAG).
    LinkState {
        Up = 1 => "up",
        Down = 2 => "down",
        Missing = 3 => "missing",
    }
);

proto_enum!(
    BgpState {
        Idle = 1 => "idle",
        Connect = 2 => "connect",
        Active = 3 => "active",
        OpenSent = 4 => "open_sent",
        OpenConfirm = 5 => "open_confirm",
        Established = 6 => "established",
    }
);

proto_enum!(
    TrafficLevel {
        Normal = 1 => "normal",
        High = 2 => "high",
        Congested = 3 => "congested",
    }
);

proto_enum!(
    /// Operação sobre entradas de tabela MAC/ARP.
    EntryAction {
        Added = 1 => "added",
        Removed = 2 => "removed",
        Moved = 3 => "moved",
    }
);

proto_enum!(
    MlagDomainState {
        Active = 1 => "active",
        Inactive = 2 => "inactive",
        Disabled = 3 => "disabled",
    }
);

proto_enum!(
    RouteMismatch {
        Missing = 1 => "missing",
        Unexpected = 2 => "unexpected",
        Partial = 3 => "partial",
    }
);

// ──────────────────────────────────────────────
// Mensagem raiz
// ──────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AosMessage {
    /// Identificador de origem: `device_key` ou `device_key::interface`.
    #[prost(string, tag = "1")]
    pub origin_name: String,
    /// Epoch em segundos.
    #[prost(uint64, optional, tag = "2")]
    pub timestamp: Option<u64>,
    #[prost(oneof = "aos_message::Data", tags = "3, 4, 5")]
    pub data: Option<aos_message::Data>,
}

pub mod aos_message {
    /// No máximo um tipo de dado por mensagem.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "3")]
        PerfMon(super::PerfMonData),
        #[prost(message, tag = "4")]
        Event(super::AosEvent),
        #[prost(message, tag = "5")]
        Alert(super::AosAlert),
    }
}

// ──────────────────────────────────────────────
// Performance monitoring
// ──────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PerfMonData {
    #[prost(message, optional, tag = "1")]
    pub interface_counters: Option<InterfaceCounters>,
    #[prost(message, optional, tag = "2")]
    pub system_resource_counters: Option<SystemResourceCounters>,
}

/// Contadores acumulados de uma interface.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InterfaceCounters {
    #[prost(uint64, tag = "1")]
    pub tx_unicast_packets: u64,
    #[prost(uint64, tag = "2")]
    pub tx_broadcast_packets: u64,
    #[prost(uint64, tag = "3")]
    pub tx_multicast_packets: u64,
    #[prost(uint64, tag = "4")]
    pub tx_bytes: u64,
    #[prost(uint64, tag = "5")]
    pub rx_unicast_packets: u64,
    #[prost(uint64, tag = "6")]
    pub rx_broadcast_packets: u64,
    #[prost(uint64, tag = "7")]
    pub rx_multicast_packets: u64,
    #[prost(uint64, tag = "8")]
    pub rx_bytes: u64,
    #[prost(uint64, tag = "9")]
    pub tx_error_packets: u64,
    #[prost(uint64, tag = "10")]
    pub rx_error_packets: u64,
    #[prost(uint64, tag = "11")]
    pub tx_discard_packets: u64,
    #[prost(uint64, tag = "12")]
    pub rx_discard_packets: u64,
    #[prost(uint64, tag = "13")]
    pub alignment_errors: u64,
    #[prost(uint64, tag = "14")]
    pub fcs_errors: u64,
    #[prost(uint64, tag = "15")]
    pub symbol_errors: u64,
    #[prost(uint64, tag = "16")]
    pub runts: u64,
    #[prost(uint64, tag = "17")]
    pub giants: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SystemResourceCounters {
    #[prost(message, optional, tag = "1")]
    pub system_info: Option<SystemInfo>,
    #[prost(message, repeated, tag = "2")]
    pub process_info: Vec<ProcessInfo>,
    #[prost(message, repeated, tag = "3")]
    pub file_info: Vec<FileInfo>,
}

/// CPU em percentual, memória em bytes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SystemInfo {
    #[prost(double, tag = "1")]
    pub cpu_user: f64,
    #[prost(double, tag = "2")]
    pub cpu_system: f64,
    #[prost(double, tag = "3")]
    pub cpu_idle: f64,
    #[prost(uint64, tag = "4")]
    pub memory_used: u64,
    #[prost(uint64, tag = "5")]
    pub memory_total: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProcessInfo {
    #[prost(string, tag = "1")]
    pub process_name: String,
    #[prost(double, tag = "2")]
    pub cpu_user: f64,
    #[prost(double, tag = "3")]
    pub cpu_system: f64,
    #[prost(uint64, tag = "4")]
    pub memory_usage: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileInfo {
    #[prost(string, tag = "1")]
    pub file_name: String,
    #[prost(uint64, tag = "2")]
    pub file_size: u64,
}

// ──────────────────────────────────────────────
// Eventos
// ──────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AosEvent {
    #[prost(oneof = "aos_event::Data", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10")]
    pub data: Option<aos_event::Data>,
}

pub mod aos_event {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "1")]
        DeviceState(super::DeviceStateEvent),
        #[prost(message, tag = "2")]
        Streaming(super::StreamingEvent),
        #[prost(message, tag = "3")]
        CablePeer(super::CablePeerEvent),
        #[prost(message, tag = "4")]
        BgpNeighbor(super::BgpNeighborEvent),
        #[prost(message, tag = "5")]
        LinkStatus(super::LinkStatusEvent),
        #[prost(message, tag = "6")]
        Traffic(super::TrafficEvent),
        #[prost(message, tag = "7")]
        MacState(super::MacStateEvent),
        #[prost(message, tag = "8")]
        ArpState(super::ArpStateEvent),
        #[prost(message, tag = "9")]
        LagState(super::LagStateEvent),
        #[prost(message, tag = "10")]
        MlagState(super::MlagStateEvent),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceStateEvent {
    #[prost(enumeration = "DeviceStatus", tag = "1")]
    pub value: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamingEvent {
    #[prost(enumeration = "StreamingStatus", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub address: String,
    #[prost(uint32, tag = "3")]
    pub port: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CablePeerEvent {
    #[prost(string, tag = "1")]
    pub system_id: String,
    #[prost(string, tag = "2")]
    pub interface_name: String,
    #[prost(string, tag = "3")]
    pub peer_system_id: String,
    #[prost(string, tag = "4")]
    pub peer_interface_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BgpNeighborEvent {
    #[prost(string, tag = "1")]
    pub source_ip: String,
    #[prost(uint32, tag = "2")]
    pub source_asn: u32,
    #[prost(string, tag = "3")]
    pub dest_ip: String,
    #[prost(uint32, tag = "4")]
    pub dest_asn: u32,
    #[prost(string, tag = "5")]
    pub vrf_name: String,
    #[prost(string, tag = "6")]
    pub addr_family: String,
    #[prost(enumeration = "BgpState", tag = "7")]
    pub value: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LinkStatusEvent {
    #[prost(string, tag = "1")]
    pub interface_name: String,
    #[prost(enumeration = "LinkState", tag = "2")]
    pub value: i32,
    #[prost(uint64, optional, tag = "3")]
    pub speed: Option<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrafficEvent {
    #[prost(string, tag = "1")]
    pub interface_name: String,
    #[prost(enumeration = "TrafficLevel", tag = "2")]
    pub value: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MacStateEvent {
    #[prost(string, tag = "1")]
    pub mac_address: String,
    #[prost(uint32, tag = "2")]
    pub vlan: u32,
    #[prost(string, tag = "3")]
    pub interface_name: String,
    #[prost(enumeration = "EntryAction", tag = "4")]
    pub action: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArpStateEvent {
    #[prost(string, tag = "1")]
    pub ip_address: String,
    #[prost(string, tag = "2")]
    pub mac_address: String,
    #[prost(string, tag = "3")]
    pub interface_name: String,
    #[prost(enumeration = "EntryAction", tag = "4")]
    pub action: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LagStateEvent {
    #[prost(string, tag = "1")]
    pub lag_name: String,
    #[prost(string, tag = "2")]
    pub interface_name: String,
    #[prost(enumeration = "LinkState", tag = "3")]
    pub value: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MlagStateEvent {
    #[prost(string, tag = "1")]
    pub domain_id: String,
    #[prost(enumeration = "MlagDomainState", tag = "2")]
    pub domain_state: i32,
    #[prost(string, tag = "3")]
    pub peer_address: String,
}

// ──────────────────────────────────────────────
// Alertas
// ──────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AosAlert {
    /// Epoch em segundos da primeira ocorrência.
    #[prost(uint64, tag = "1")]
    pub first_seen: u64,
    #[prost(enumeration = "AlertSeverity", tag = "2")]
    pub severity: i32,
    /// `true` = alerta levantado, `false` = limpo.
    #[prost(bool, tag = "3")]
    pub raised: bool,
    #[prost(
        oneof = "aos_alert::Data",
        tags = "4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20"
    )]
    pub data: Option<aos_alert::Data>,
}

pub mod aos_alert {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "4")]
        ConfigDeviationAlert(super::ConfigDeviationAlert),
        #[prost(message, tag = "5")]
        StreamingAlert(super::StreamingAlert),
        #[prost(message, tag = "6")]
        CablePeerMismatchAlert(super::CablePeerMismatchAlert),
        #[prost(message, tag = "7")]
        BgpNeighborMismatchAlert(super::BgpNeighborMismatchAlert),
        #[prost(message, tag = "8")]
        InterfaceLinkStatusMismatchAlert(super::InterfaceLinkStatusMismatchAlert),
        #[prost(message, tag = "9")]
        HostnameAlert(super::HostnameAlert),
        #[prost(message, tag = "10")]
        RouteAlert(super::RouteAlert),
        #[prost(message, tag = "11")]
        LivenessAlert(super::LivenessAlert),
        #[prost(message, tag = "12")]
        DeploymentAlert(super::DeploymentAlert),
        #[prost(message, tag = "13")]
        BlueprintRenderingAlert(super::BlueprintRenderingAlert),
        #[prost(message, tag = "14")]
        CountersAlert(super::CountersAlert),
        #[prost(message, tag = "15")]
        MacAlert(super::MacAlert),
        #[prost(message, tag = "16")]
        ArpAlert(super::ArpAlert),
        #[prost(message, tag = "17")]
        HeadroomAlert(super::HeadroomAlert),
        #[prost(message, tag = "18")]
        LagAlert(super::LagAlert),
        #[prost(message, tag = "19")]
        MlagAlert(super::MlagAlert),
        #[prost(message, tag = "20")]
        TestAlert(super::TestAlert),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigDeviationAlert {
    #[prost(string, tag = "1")]
    pub expected_config: String,
    #[prost(string, tag = "2")]
    pub actual_config: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamingAlert {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(uint32, tag = "2")]
    pub port: u32,
    #[prost(string, tag = "3")]
    pub reason: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CablePeerMismatchAlert {
    #[prost(string, tag = "1")]
    pub interface_name: String,
    #[prost(string, tag = "2")]
    pub expected_peer_system_id: String,
    #[prost(string, tag = "3")]
    pub actual_peer_system_id: String,
    #[prost(string, tag = "4")]
    pub expected_peer_interface: String,
    #[prost(string, tag = "5")]
    pub actual_peer_interface: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BgpNeighborMismatchAlert {
    #[prost(string, tag = "1")]
    pub source_ip: String,
    #[prost(string, tag = "2")]
    pub dest_ip: String,
    #[prost(uint32, tag = "3")]
    pub source_asn: u32,
    #[prost(uint32, tag = "4")]
    pub dest_asn: u32,
    #[prost(string, tag = "5")]
    pub vrf_name: String,
    #[prost(enumeration = "BgpState", tag = "6")]
    pub expected_state: i32,
    #[prost(enumeration = "BgpState", tag = "7")]
    pub actual_state: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InterfaceLinkStatusMismatchAlert {
    #[prost(string, tag = "1")]
    pub interface_name: String,
    #[prost(enumeration = "LinkState", tag = "2")]
    pub expected_state: i32,
    #[prost(enumeration = "LinkState", tag = "3")]
    pub actual_state: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HostnameAlert {
    #[prost(string, tag = "1")]
    pub expected_hostname: String,
    #[prost(string, tag = "2")]
    pub actual_hostname: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RouteAlert {
    #[prost(string, tag = "1")]
    pub destination_ip: String,
    #[prost(string, tag = "2")]
    pub vrf_name: String,
    #[prost(enumeration = "RouteMismatch", tag = "3")]
    pub mismatch: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LivenessAlert {
    #[prost(string, tag = "1")]
    pub system_id: String,
    #[prost(string, tag = "2")]
    pub agent_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeploymentAlert {
    #[prost(uint64, tag = "1")]
    pub config_version: u64,
    #[prost(string, tag = "2")]
    pub error_message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlueprintRenderingAlert {
    #[prost(string, tag = "1")]
    pub blueprint_id: String,
    #[prost(string, tag = "2")]
    pub error_message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CountersAlert {
    #[prost(string, tag = "1")]
    pub interface_name: String,
    #[prost(string, tag = "2")]
    pub counter_name: String,
    #[prost(uint64, tag = "3")]
    pub threshold: u64,
    #[prost(uint64, tag = "4")]
    pub value: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MacAlert {
    #[prost(string, tag = "1")]
    pub mac_address: String,
    #[prost(uint32, tag = "2")]
    pub vlan: u32,
    #[prost(string, tag = "3")]
    pub expected_interface: String,
    #[prost(string, tag = "4")]
    pub actual_interface: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArpAlert {
    #[prost(string, tag = "1")]
    pub ip_address: String,
    #[prost(string, tag = "2")]
    pub interface_name: String,
    #[prost(string, tag = "3")]
    pub expected_mac: String,
    #[prost(string, tag = "4")]
    pub actual_mac: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeadroomAlert {
    #[prost(string, tag = "1")]
    pub source_system: String,
    #[prost(string, tag = "2")]
    pub destination_system: String,
    #[prost(double, tag = "3")]
    pub threshold: f64,
    #[prost(double, tag = "4")]
    pub headroom: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LagAlert {
    #[prost(string, tag = "1")]
    pub lag_name: String,
    #[prost(string, tag = "2")]
    pub interface_name: String,
    #[prost(enumeration = "LinkState", tag = "3")]
    pub expected_state: i32,
    #[prost(enumeration = "LinkState", tag = "4")]
    pub actual_state: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MlagAlert {
    #[prost(string, tag = "1")]
    pub domain_id: String,
    #[prost(enumeration = "MlagDomainState", tag = "2")]
    pub expected_state: i32,
    #[prost(enumeration = "MlagDomainState", tag = "3")]
    pub actual_state: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TestAlert {
    #[prost(string, tag = "1")]
    pub message: String,
}

// ──────────────────────────────────────────────
// Tabelas de descritores
// ──────────────────────────────────────────────

impl_record!(InterfaceCounters {
    tx_unicast_packets: scalar,
    tx_broadcast_packets: scalar,
    tx_multicast_packets: scalar,
    tx_bytes: scalar,
    rx_unicast_packets: scalar,
    rx_broadcast_packets: scalar,
    rx_multicast_packets: scalar,
    rx_bytes: scalar,
    tx_error_packets: scalar,
    rx_error_packets: scalar,
    tx_discard_packets: scalar,
    rx_discard_packets: scalar,
    alignment_errors: scalar,
    fcs_errors: scalar,
    symbol_errors: scalar,
    runts: scalar,
    giants: scalar,
});

impl_record!(SystemInfo {
    cpu_user: scalar,
    cpu_system: scalar,
    cpu_idle: scalar,
    memory_used: scalar,
    memory_total: scalar,
});

impl_record!(ProcessInfo {
    process_name: scalar,
    cpu_user: scalar,
    cpu_system: scalar,
    memory_usage: scalar,
});

impl_record!(FileInfo {
    file_name: scalar,
    file_size: scalar,
});

impl_record!(DeviceStateEvent {
    value: enumeration(DeviceStatus),
});

impl_record!(StreamingEvent {
    status: enumeration(StreamingStatus),
    address: scalar,
    port: scalar,
});

impl_record!(CablePeerEvent {
    system_id: scalar,
    interface_name: scalar,
    peer_system_id: scalar,
    peer_interface_name: scalar,
});

impl_record!(BgpNeighborEvent {
    source_ip: scalar,
    source_asn: scalar,
    dest_ip: scalar,
    dest_asn: scalar,
    vrf_name: scalar,
    addr_family: scalar,
    value: enumeration(BgpState),
});

impl_record!(LinkStatusEvent {
    interface_name: scalar,
    value: enumeration(LinkState),
    speed: scalar,
});

impl_record!(TrafficEvent {
    interface_name: scalar,
    value: enumeration(TrafficLevel),
});

impl_record!(MacStateEvent {
    mac_address: scalar,
    vlan: scalar,
    interface_name: scalar,
    action: enumeration(EntryAction),
});

impl_record!(ArpStateEvent {
    ip_address: scalar,
    mac_address: scalar,
    interface_name: scalar,
    action: enumeration(EntryAction),
});

impl_record!(LagStateEvent {
    lag_name: scalar,
    interface_name: scalar,
    value: enumeration(LinkState),
});

impl_record!(MlagStateEvent {
    domain_id: scalar,
    domain_state: enumeration(MlagDomainState),
    peer_address: scalar,
});

impl_record!(ConfigDeviationAlert {
    expected_config: scalar,
    actual_config: scalar,
});

impl_record!(StreamingAlert {
    address: scalar,
    port: scalar,
    reason: scalar,
});

impl_record!(CablePeerMismatchAlert {
    interface_name: scalar,
    expected_peer_system_id: scalar,
    actual_peer_system_id: scalar,
    expected_peer_interface: scalar,
    actual_peer_interface: scalar,
});

impl_record!(BgpNeighborMismatchAlert {
    source_ip: scalar,
    dest_ip: scalar,
    source_asn: scalar,
    dest_asn: scalar,
    vrf_name: scalar,
    expected_state: enumeration(BgpState),
    actual_state: enumeration(BgpState),
});

impl_record!(InterfaceLinkStatusMismatchAlert {
    interface_name: scalar,
    expected_state: enumeration(LinkState),
    actual_state: enumeration(LinkState),
});

impl_record!(HostnameAlert {
    expected_hostname: scalar,
    actual_hostname: scalar,
});

impl_record!(RouteAlert {
    destination_ip: scalar,
    vrf_name: scalar,
    mismatch: enumeration(RouteMismatch),
});

impl_record!(LivenessAlert {
    system_id: scalar,
    agent_name: scalar,
});

impl_record!(DeploymentAlert {
    config_version: scalar,
    error_message: scalar,
});

impl_record!(BlueprintRenderingAlert {
    blueprint_id: scalar,
    error_message: scalar,
});

impl_record!(CountersAlert {
    interface_name: scalar,
    counter_name: scalar,
    threshold: scalar,
    value: scalar,
});

impl_record!(MacAlert {
    mac_address: scalar,
    vlan: scalar,
    expected_interface: scalar,
    actual_interface: scalar,
});

impl_record!(ArpAlert {
    ip_address: scalar,
    interface_name: scalar,
    expected_mac: scalar,
    actual_mac: scalar,
});

impl_record!(HeadroomAlert {
    source_system: scalar,
    destination_system: scalar,
    threshold: scalar,
    headroom: scalar,
});

impl_record!(LagAlert {
    lag_name: scalar,
    interface_name: scalar,
    expected_state: enumeration(LinkState),
    actual_state: enumeration(LinkState),
});

impl_record!(MlagAlert {
    domain_id: scalar,
    expected_state: enumeration(MlagDomainState),
    actual_state: enumeration(MlagDomainState),
});

impl_record!(TestAlert {
    message: scalar,
});
