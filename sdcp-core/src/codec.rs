//! `tokio_util` codec for framed one-shot exchanges.
//!
//! The decoder buffers until the full declared frame is available, so a
//! response split across TCP segments is reassembled rather than failing
//! on a short read.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::SdcpError;
use crate::frame::{HEADER_LENGTH, RequestFrame, ResponseFrame};

/// Controller-side codec: encodes requests, decodes responses.
pub struct SdcpCodec;

impl Decoder for SdcpCodec {
    type Item = ResponseFrame;
    type Error = SdcpError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_LENGTH {
            return Ok(None);
        }
        let total = HEADER_LENGTH + src[9] as usize;
        if src.len() < total {
            return Ok(None);
        }
        let frame = src.split_to(total);
        ResponseFrame::from_bytes(&frame).map(Some)
    }
}

impl Encoder<RequestFrame> for SdcpCodec {
    type Error = SdcpError;

    fn encode(&mut self, item: RequestFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item.to_bytes());
        Ok(())
    }
}
