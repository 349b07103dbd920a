//! Flattening genérico de registros estruturados em `fields` + `tags`.
//!
//! Cada tipo de registro (contadores, payloads de evento/alerta) expõe uma
//! tabela estática de descritores gerada em tempo de compilação pelo macro
//! [`impl_record!`]. O flattener percorre essa tabela na ordem de declaração,
//! sem introspecção em runtime:
//!
//! ```text
//! descriptors(): [ (nome, kind) ... ]      kind ∈ {Scalar, Enum, Nested, Reserved}
//! values():      [ FieldValue ... ]        mesma ordem
//! ```
//!
//! Dois modos de projeção:
//! - **Contadores** – escalares viram `fields`, enums viram `tags`
//! - **Ocorrência** (eventos/alertas) – tudo vira `tags` (string), e um
//!   indicador sintético (`event=1` ou `status=1|0`) é o único field

use crate::metric::{Fields, Scalar, Tags};

/// Nome usado quando um enum chega com valor numérico desconhecido.
pub const UNKNOWN_ENUM: &str = "UNKNOWN";

/// Prefixo dos campos internos/reservados (comparação case-insensitive).
const RESERVED_PREFIX: &str = "xxx_";

// ──────────────────────────────────────────────
// Descritores
// ──────────────────────────────────────────────

/// Categoria de um campo declarado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Enum,
    Nested,
    Reserved,
}

/// Entrada da tabela de descritores de um registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Campos reservados nunca chegam à saída.
    pub fn is_reserved(&self) -> bool {
        self.kind == FieldKind::Reserved || is_reserved_name(self.name)
    }
}

/// Verifica a convenção de nomes internos (`XXX_...`).
pub fn is_reserved_name(name: &str) -> bool {
    name.get(..RESERVED_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RESERVED_PREFIX))
}

/// Valor de um campo, já convertido para a forma que o flattener entende.
pub enum FieldValue<'a> {
    Scalar(Scalar),
    /// Nome simbólico do enum, nunca o número.
    Enum(&'static str),
    Nested(&'a dyn Record),
    /// Campo opcional ausente ou reservado.
    Absent,
}

impl<'a> FieldValue<'a> {
    pub fn scalar<T: ToScalar + ?Sized>(value: &T) -> Self {
        match value.to_scalar() {
            Some(s) => FieldValue::Scalar(s),
            None => FieldValue::Absent,
        }
    }

    pub fn enumeration<E: SymbolicEnum>(value: i32) -> Self {
        FieldValue::Enum(E::name_of(value))
    }

    pub fn nested<R: Record>(value: &'a Option<R>) -> Self {
        match value {
            Some(inner) => FieldValue::Nested(inner),
            None => FieldValue::Absent,
        }
    }
}

/// Registro com tabela de descritores estática.
///
/// Implementado via [`impl_record!`]; `values()` deve seguir exatamente a
/// ordem de `descriptors()`.
pub trait Record {
    fn descriptors(&self) -> &'static [FieldDescriptor];
    fn values(&self) -> Vec<FieldValue<'_>>;
}

/// Enum protobuf com nome simbólico por valor.
pub trait SymbolicEnum {
    /// Nome simbólico; [`UNKNOWN_ENUM`] para valores fora do enum.
    fn name_of(value: i32) -> &'static str;
}

/// Conversão de tipos escalares protobuf em [`Scalar`].
pub trait ToScalar {
    fn to_scalar(&self) -> Option<Scalar>;
}

macro_rules! to_scalar_as {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(impl ToScalar for $source {
            fn to_scalar(&self) -> Option<Scalar> {
                Some(Scalar::$variant(*self as $target))
            }
        })+
    };
}

to_scalar_as!(UInt(u64): u64, u32);
to_scalar_as!(Int(i64): i64, i32);
to_scalar_as!(Float(f64): f64, f32);

impl ToScalar for bool {
    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bool(*self))
    }
}

impl ToScalar for String {
    fn to_scalar(&self) -> Option<Scalar> {
        Some(Scalar::Str(self.clone()))
    }
}

impl<T: ToScalar> ToScalar for Option<T> {
    fn to_scalar(&self) -> Option<Scalar> {
        self.as_ref().and_then(ToScalar::to_scalar)
    }
}

// ──────────────────────────────────────────────
// Macro de descritores
// ──────────────────────────────────────────────

/// Gera a implementação de [`Record`] para um struct.
///
/// ```ignore
/// impl_record!(LinkStatusEvent {
///     interface_name: scalar,
///     value: enumeration(LinkState),
///     peer: nested,
///     xxx_cache: reserved,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($field:ident : $kind:ident $(($enum_ty:ty))?),* $(,)? }) => {
        impl $crate::flatten::Record for $ty {
            fn descriptors(&self) -> &'static [$crate::flatten::FieldDescriptor] {
                const FIELDS: &[$crate::flatten::FieldDescriptor] = &[
                    $($crate::flatten::FieldDescriptor {
                        name: stringify!($field),
                        kind: $crate::__field_kind!($kind),
                    }),*
                ];
                FIELDS
            }

            fn values(&self) -> ::std::vec::Vec<$crate::flatten::FieldValue<'_>> {
                ::std::vec![$($crate::__field_value!(self.$field, $kind $(($enum_ty))?)),*]
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_kind {
    (scalar) => { $crate::flatten::FieldKind::Scalar };
    (enumeration) => { $crate::flatten::FieldKind::Enum };
    (nested) => { $crate::flatten::FieldKind::Nested };
    (reserved) => { $crate::flatten::FieldKind::Reserved };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_value {
    ($value:expr, scalar) => { $crate::flatten::FieldValue::scalar(&$value) };
    ($value:expr, enumeration ($enum_ty:ty)) => {
        $crate::flatten::FieldValue::enumeration::<$enum_ty>($value)
    };
    ($value:expr, nested) => { $crate::flatten::FieldValue::nested(&$value) };
    ($value:expr, reserved) => { $crate::flatten::FieldValue::Absent };
}

// ──────────────────────────────────────────────
// Projeções
// ──────────────────────────────────────────────

/// Tipo de ocorrência e o indicador sintético que ela carrega.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Event,
    Alert { raised: bool },
}

impl Occurrence {
    /// `event=1` para eventos, `status=1|0` (raised/cleared) para alertas.
    pub fn indicator(&self) -> (&'static str, Scalar) {
        match self {
            Occurrence::Event => ("event", Scalar::Int(1)),
            Occurrence::Alert { raised } => ("status", Scalar::Int(i64::from(*raised))),
        }
    }
}

enum Leaf {
    Scalar(Scalar),
    Enum(&'static str),
}

/// Modo contador: escalares em `fields`, enums em `tags`.
///
/// `exclude` lista campos de topo que o chamador anexa manualmente
/// (ex.: `process_name`).
pub fn flatten_counters(record: &dyn Record, exclude: &[&str], fields: &mut Fields, tags: &mut Tags) {
    walk(record, None, exclude, &mut |name, leaf| match leaf {
        Leaf::Scalar(value) => {
            fields.insert(name, value);
        }
        Leaf::Enum(symbol) => {
            tags.insert(name, symbol.to_string());
        }
    });
}

/// Modo ocorrência: todo campo não reservado vira tag string.
pub fn flatten_occurrence(record: &dyn Record, exclude: &[&str], tags: &mut Tags) {
    walk(record, None, exclude, &mut |name, leaf| {
        let value = match leaf {
            Leaf::Scalar(value) => value.to_string(),
            Leaf::Enum(symbol) => symbol.to_string(),
        };
        tags.insert(name, value);
    });
}

fn walk(record: &dyn Record, prefix: Option<&str>, exclude: &[&str], emit: &mut dyn FnMut(String, Leaf)) {
    for (descriptor, value) in record.descriptors().iter().zip(record.values()) {
        if descriptor.is_reserved() {
            continue;
        }
        if prefix.is_none() && exclude.contains(&descriptor.name) {
            continue;
        }

        let name = match prefix {
            Some(parent) => format!("{parent}_{}", descriptor.name),
            None => descriptor.name.to_string(),
        };

        match value {
            FieldValue::Scalar(s) => emit(name, Leaf::Scalar(s)),
            FieldValue::Enum(symbol) => emit(name, Leaf::Enum(symbol)),
            FieldValue::Nested(inner) => walk(inner, Some(&name), exclude, emit),
            FieldValue::Absent => {}
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{LinkState, LinkStatusEvent, SystemInfo};

    struct Peer {
        system_id: String,
        state: i32,
    }

    impl_record!(Peer {
        system_id: scalar,
        state: enumeration(LinkState),
    });

    #[allow(dead_code, non_snake_case)]
    struct Sample {
        name: String,
        speed: u64,
        state: i32,
        mtu: Option<u32>,
        peer: Option<Peer>,
        xxx_cache: Vec<u8>,
        XXX_unrecognized: u32,
    }

    impl_record!(Sample {
        name: scalar,
        speed: scalar,
        state: enumeration(LinkState),
        mtu: scalar,
        peer: nested,
        xxx_cache: reserved,
        XXX_unrecognized: scalar,
    });

    fn sample() -> Sample {
        Sample {
            name: "et-0/0/1".into(),
            speed: 10_000,
            state: LinkState::Up as i32,
            mtu: None,
            peer: Some(Peer {
                system_id: "spine1".into(),
                state: LinkState::Down as i32,
            }),
            xxx_cache: vec![1, 2, 3],
            XXX_unrecognized: 7,
        }
    }

    #[test]
    fn descriptors_follow_declaration_order() {
        let names: Vec<_> = sample().descriptors().iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            ["name", "speed", "state", "mtu", "peer", "xxx_cache", "XXX_unrecognized"]
        );
    }

    #[test]
    fn counters_split_scalars_and_enums() {
        let mut fields = Fields::new();
        let mut tags = Tags::new();
        flatten_counters(&sample(), &["name"], &mut fields, &mut tags);

        assert_eq!(fields.get("speed"), Some(&Scalar::UInt(10_000)));
        assert!(!fields.contains_key("name"));
        assert!(!fields.contains_key("mtu"), "opcional ausente não gera field");
        assert_eq!(fields.get("peer_system_id"), Some(&Scalar::Str("spine1".into())));
        assert_eq!(tags.get("state").map(String::as_str), Some("up"));
        assert_eq!(tags.get("peer_state").map(String::as_str), Some("down"));
    }

    #[test]
    fn reserved_fields_never_surface() {
        let mut fields = Fields::new();
        let mut tags = Tags::new();
        flatten_counters(&sample(), &[], &mut fields, &mut tags);
        flatten_occurrence(&sample(), &[], &mut tags);

        for key in fields.keys().chain(tags.keys()) {
            assert!(!is_reserved_name(key), "campo reservado vazou: {key}");
        }
    }

    #[test]
    fn occurrence_puts_everything_in_tags() {
        let mut tags = Tags::new();
        flatten_occurrence(&sample(), &[], &mut tags);

        assert_eq!(tags.get("name").map(String::as_str), Some("et-0/0/1"));
        assert_eq!(tags.get("speed").map(String::as_str), Some("10000"));
        assert_eq!(tags.get("state").map(String::as_str), Some("up"));
        assert_eq!(tags.get("peer_system_id").map(String::as_str), Some("spine1"));
    }

    #[test]
    fn unknown_enum_value_is_never_numeric() {
        let event = LinkStatusEvent {
            interface_name: "et-0/0/2".into(),
            value: 42,
            ..Default::default()
        };
        let mut tags = Tags::new();
        flatten_occurrence(&event, &[], &mut tags);
        assert_eq!(tags.get("value").map(String::as_str), Some(UNKNOWN_ENUM));
    }

    #[test]
    fn generated_proto_records_flatten() {
        let info = SystemInfo {
            cpu_user: 12.5,
            cpu_system: 3.0,
            cpu_idle: 84.5,
            memory_used: 1024,
            memory_total: 4096,
        };
        let mut fields = Fields::new();
        let mut tags = Tags::new();
        flatten_counters(&info, &[], &mut fields, &mut tags);

        assert_eq!(fields.len(), 5);
        assert_eq!(fields.get("cpu_user"), Some(&Scalar::Float(12.5)));
        assert_eq!(fields.get("memory_total"), Some(&Scalar::UInt(4096)));
        assert!(tags.is_empty());
    }

    #[test]
    fn indicators() {
        assert_eq!(Occurrence::Event.indicator(), ("event", Scalar::Int(1)));
        assert_eq!(
            Occurrence::Alert { raised: true }.indicator(),
            ("status", Scalar::Int(1))
        );
        assert_eq!(
            Occurrence::Alert { raised: false }.indicator(),
            ("status", Scalar::Int(0))
        );
    }

    #[test]
    fn reserved_name_convention() {
        assert!(is_reserved_name("XXX_unrecognized"));
        assert!(is_reserved_name("xxx_sizecache"));
        assert!(!is_reserved_name("xx"));
        assert!(!is_reserved_name("tx_bytes"));
    }
}
