//! Protocolo de comunicação binário do streaming AOS.
//!
//! Cada mensagem trafega numa conexão TCP persistente como um frame:
//!
//! ```text
//! ┌────────────────────┬─────────────────────────────┐
//! │ Tamanho (2, BE u16)│ Payload protobuf (N bytes)  │
//! └────────────────────┴─────────────────────────────┘
//! ```
//!
//! - Sem magic byte nem versão: o device fala exatamente este formato
//! - Tamanho máximo do payload = 65535 bytes (teto natural do u16)
//! - Payload = [`AosMessage`] serializado com protobuf

use crate::proto::AosMessage;
use prost::Message;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Tamanho do prefixo de tamanho.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Maior payload representável no prefixo.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Erros do protocolo.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Prefixo de tamanho truncado ({0} de {LENGTH_PREFIX_SIZE} bytes)")]
    TruncatedLength(usize),

    #[error("Payload de {0} bytes excede o máximo de {MAX_FRAME_LEN}")]
    FrameTooLarge(usize),

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    Serialize(String),

    #[error("Erro de deserialização: {0}")]
    Deserialize(String),
}

impl From<prost::DecodeError> for ProtocolError {
    fn from(e: prost::DecodeError) -> Self {
        ProtocolError::Deserialize(e.to_string())
    }
}

/// Monta um frame `[len][payload]`.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let len = u16::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge(payload.len()))?;

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);

    Ok(frame)
}

/// Serializa uma [`AosMessage`] já enquadrada para o socket.
pub fn encode_message(message: &AosMessage) -> Result<Vec<u8>, ProtocolError> {
    let body = message.encode_to_vec();
    if body.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::Serialize(format!(
            "mensagem de {} bytes não cabe num frame",
            body.len()
        )));
    }
    encode_frame(&body)
}

/// Decodifica o payload de um frame em [`AosMessage`].
pub fn decode_message(payload: &[u8]) -> Result<AosMessage, ProtocolError> {
    Ok(AosMessage::decode(payload)?)
}

// ──────────────────────────────────────────────
// Leitor de frames
// ──────────────────────────────────────────────

/// Um frame lido do socket. O payload é emprestado do buffer do leitor.
#[derive(Debug, PartialEq, Eq)]
pub struct RawFrame<'a> {
    /// Tamanho anunciado no prefixo.
    pub declared_len: u16,
    pub payload: &'a [u8],
}

impl RawFrame<'_> {
    /// O peer fechou antes de completar o payload.
    pub fn is_short(&self) -> bool {
        self.payload.len() < usize::from(self.declared_len)
    }
}

/// Converte um byte stream numa sequência de frames.
///
/// Sequência preguiçosa e não reiniciável: depois de `Ok(None)` ou `Err`
/// a conexão deve ser liberada.
pub struct FrameReader<R> {
    inner: R,
    buf: Vec<u8>,
    finished: bool,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(MAX_FRAME_LEN),
            finished: false,
        }
    }

    /// Lê o próximo frame.
    ///
    /// - `Ok(None)`: peer fechou antes de qualquer byte do prefixo
    /// - `Err(TruncatedLength)`: prefixo incompleto
    /// - `Ok(Some(frame))`: frame lido; pode ser curto (ver [`RawFrame::is_short`])
    pub async fn next_frame(&mut self) -> Result<Option<RawFrame<'_>>, ProtocolError> {
        if self.finished {
            return Ok(None);
        }

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        let got = match read_up_to(&mut self.inner, &mut prefix).await {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Err(e.into());
            }
        };
        match got {
            0 => {
                self.finished = true;
                return Ok(None);
            }
            LENGTH_PREFIX_SIZE => {}
            partial => {
                self.finished = true;
                return Err(ProtocolError::TruncatedLength(partial));
            }
        }

        let declared_len = u16::from_be_bytes(prefix);
        self.buf.clear();
        self.buf.resize(usize::from(declared_len), 0);

        let got = match read_up_to(&mut self.inner, &mut self.buf).await {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Err(e.into());
            }
        };
        if got < self.buf.len() {
            // Peer fechou no meio do payload: nada mais virá depois dele.
            self.finished = true;
        }

        Ok(Some(RawFrame {
            declared_len,
            payload: &self.buf[..got],
        }))
    }

    /// Devolve o stream subjacente.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Lê até encher `buf` ou até EOF; retorna quantos bytes vieram.
async fn read_up_to<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{aos_message, AosEvent, PerfMonData};

    fn sample_message() -> AosMessage {
        AosMessage {
            origin_name: "leaf1::et-0/0/1".into(),
            timestamp: Some(1_700_000_000),
            data: Some(aos_message::Data::PerfMon(PerfMonData::default())),
        }
    }

    #[tokio::test]
    async fn frame_roundtrip_at_boundary_lengths() {
        for len in [0usize, 1, 2, 255, 256, 4096, MAX_FRAME_LEN] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let frame = encode_frame(&payload).unwrap();
            assert_eq!(frame.len(), LENGTH_PREFIX_SIZE + len);

            let mut reader = FrameReader::new(frame.as_slice());
            let raw = reader.next_frame().await.unwrap().expect("frame");
            assert!(!raw.is_short());
            assert_eq!(raw.payload, payload.as_slice());
            assert!(reader.next_frame().await.unwrap().is_none());
        }
    }

    #[test]
    fn rejects_oversized_payload() {
        let payload = vec![0u8; MAX_FRAME_LEN + 1];
        assert!(matches!(
            encode_frame(&payload),
            Err(ProtocolError::FrameTooLarge(n)) if n == MAX_FRAME_LEN + 1
        ));
    }

    #[test]
    fn prefix_is_big_endian() {
        let frame = encode_frame(&[0xAA; 0x0102]).unwrap();
        assert_eq!(&frame[..2], &[0x01, 0x02]);
    }

    #[tokio::test]
    async fn empty_stream_ends_sequence() {
        let mut reader = FrameReader::new(&b""[..]);
        assert!(reader.next_frame().await.unwrap().is_none());
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn one_byte_prefix_is_truncated() {
        let mut reader = FrameReader::new(&[0x00][..]);
        assert!(matches!(
            reader.next_frame().await,
            Err(ProtocolError::TruncatedLength(1))
        ));
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn short_payload_is_flagged_and_ends_sequence() {
        let bytes = [0x00, 0x05, b'a', b'b'];
        let mut reader = FrameReader::new(&bytes[..]);
        {
            let raw = reader.next_frame().await.unwrap().expect("frame curto");
            assert!(raw.is_short());
            assert_eq!(raw.declared_len, 5);
            assert_eq!(raw.payload, b"ab");
        }
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn consecutive_frames_keep_wire_order() {
        let mut wire = Vec::new();
        for name in ["a", "b", "c"] {
            let msg = AosMessage {
                origin_name: name.into(),
                ..Default::default()
            };
            wire.extend(encode_message(&msg).unwrap());
        }

        let mut reader = FrameReader::new(wire.as_slice());
        let mut seen = Vec::new();
        while let Some(raw) = reader.next_frame().await.unwrap() {
            seen.push(decode_message(raw.payload).unwrap().origin_name);
        }
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn message_roundtrip() {
        let original = sample_message();
        let frame = encode_message(&original).unwrap();
        let decoded = decode_message(&frame[LENGTH_PREFIX_SIZE..]).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn message_without_data_is_valid() {
        let msg = AosMessage {
            origin_name: "spine1".into(),
            ..Default::default()
        };
        let frame = encode_message(&msg).unwrap();
        let decoded = decode_message(&frame[LENGTH_PREFIX_SIZE..]).unwrap();
        assert!(decoded.data.is_none());
    }

    #[test]
    fn garbage_payload_fails_to_decode() {
        // Tag de campo com wire type inválido (7).
        assert!(matches!(
            decode_message(&[0x0F, 0xFF, 0xFF]),
            Err(ProtocolError::Deserialize(_))
        ));
    }

    #[test]
    fn event_payload_roundtrip_keeps_empty_oneof() {
        let msg = AosMessage {
            origin_name: "leaf2".into(),
            timestamp: None,
            data: Some(aos_message::Data::Event(AosEvent { data: None })),
        };
        let frame = encode_message(&msg).unwrap();
        assert_eq!(decode_message(&frame[LENGTH_PREFIX_SIZE..]).unwrap(), msg);
    }
}
