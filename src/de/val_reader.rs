use std::io::{self, BufRead, Read};
use std::marker::PhantomData;

use byteorder::ByteOrder;
use byteorder::ReadBytesExt;
use tracing::warn;

use crate::{PlyError, ScalarType, ScalarValue};

/// Reads scalars from the body of a PLY file, one value per call.
///
/// Binary readers have no record delimiters. ASCII readers treat each
/// non-empty line as one record, so callers bracket every record with
/// [`read_row_start`](Self::read_row_start) and [`read_row_end`](Self::read_row_end).
pub trait ScalarReader {
    fn read_i8(&mut self) -> Result<i8, PlyError>;
    fn read_u8(&mut self) -> Result<u8, PlyError>;
    fn read_i16(&mut self) -> Result<i16, PlyError>;
    fn read_u16(&mut self) -> Result<u16, PlyError>;
    fn read_i32(&mut self) -> Result<i32, PlyError>;
    fn read_u32(&mut self) -> Result<u32, PlyError>;
    fn read_f32(&mut self) -> Result<f32, PlyError>;
    fn read_f64(&mut self) -> Result<f64, PlyError>;

    fn read_row_start(&mut self) -> Result<(), PlyError>;
    fn read_row_end(&mut self) -> Result<(), PlyError>;

    fn read_scalar(&mut self, data_type: ScalarType) -> Result<ScalarValue, PlyError> {
        Ok(match data_type {
            ScalarType::I8 => ScalarValue::I8(self.read_i8()?),
            ScalarType::U8 => ScalarValue::U8(self.read_u8()?),
            ScalarType::I16 => ScalarValue::I16(self.read_i16()?),
            ScalarType::U16 => ScalarValue::U16(self.read_u16()?),
            ScalarType::I32 => ScalarValue::I32(self.read_i32()?),
            ScalarType::U32 => ScalarValue::U32(self.read_u32()?),
            ScalarType::F32 => ScalarValue::F32(self.read_f32()?),
            ScalarType::F64 => ScalarValue::F64(self.read_f64()?),
        })
    }

    /// Read a list length prefix of the given type.
    fn read_count(&mut self, count_type: ScalarType) -> Result<usize, PlyError> {
        let count = self.read_scalar(count_type)?;
        count
            .to_index()
            .ok_or_else(|| PlyError::InvalidListCount(count.to_string()))
    }
}

pub struct BinValReader<R: Read, E: ByteOrder> {
    reader: R,
    _endian: PhantomData<E>,
}

impl<R: Read, E: ByteOrder> BinValReader<R, E> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            _endian: PhantomData,
        }
    }
}

fn truncated(e: io::Error) -> PlyError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        PlyError::UnexpectedEof
    } else {
        PlyError::Io(e)
    }
}

impl<R: Read, E: ByteOrder> ScalarReader for BinValReader<R, E> {
    fn read_i8(&mut self) -> Result<i8, PlyError> {
        self.reader.read_i8().map_err(truncated)
    }

    fn read_u8(&mut self) -> Result<u8, PlyError> {
        self.reader.read_u8().map_err(truncated)
    }

    fn read_i16(&mut self) -> Result<i16, PlyError> {
        self.reader.read_i16::<E>().map_err(truncated)
    }

    fn read_u16(&mut self) -> Result<u16, PlyError> {
        self.reader.read_u16::<E>().map_err(truncated)
    }

    fn read_i32(&mut self) -> Result<i32, PlyError> {
        self.reader.read_i32::<E>().map_err(truncated)
    }

    fn read_u32(&mut self) -> Result<u32, PlyError> {
        self.reader.read_u32::<E>().map_err(truncated)
    }

    fn read_f32(&mut self) -> Result<f32, PlyError> {
        self.reader.read_f32::<E>().map_err(truncated)
    }

    fn read_f64(&mut self) -> Result<f64, PlyError> {
        self.reader.read_f64::<E>().map_err(truncated)
    }

    fn read_row_start(&mut self) -> Result<(), PlyError> {
        Ok(())
    }

    fn read_row_end(&mut self) -> Result<(), PlyError> {
        Ok(())
    }
}

pub struct AsciiValReader<R: BufRead> {
    reader: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> AsciiValReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pos: 0,
        }
    }

    fn read_ascii_token(&mut self) -> Result<&str, PlyError> {
        let rest = &self.line[self.pos..];
        let start = rest
            .find(|c: char| !c.is_ascii_whitespace())
            .ok_or(PlyError::MissingToken)?;
        let len = rest[start..]
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len() - start);

        let token_start = self.pos + start;
        self.pos = token_start + len;
        Ok(&self.line[token_start..self.pos])
    }
}

impl<R: BufRead> ScalarReader for AsciiValReader<R> {
    fn read_i8(&mut self) -> Result<i8, PlyError> {
        Ok(self.read_ascii_token()?.parse::<i8>()?)
    }

    fn read_u8(&mut self) -> Result<u8, PlyError> {
        Ok(self.read_ascii_token()?.parse::<u8>()?)
    }

    fn read_i16(&mut self) -> Result<i16, PlyError> {
        Ok(self.read_ascii_token()?.parse::<i16>()?)
    }

    fn read_u16(&mut self) -> Result<u16, PlyError> {
        Ok(self.read_ascii_token()?.parse::<u16>()?)
    }

    fn read_i32(&mut self) -> Result<i32, PlyError> {
        Ok(self.read_ascii_token()?.parse::<i32>()?)
    }

    fn read_u32(&mut self) -> Result<u32, PlyError> {
        Ok(self.read_ascii_token()?.parse::<u32>()?)
    }

    fn read_f32(&mut self) -> Result<f32, PlyError> {
        Ok(self.read_ascii_token()?.parse::<f32>()?)
    }

    fn read_f64(&mut self) -> Result<f64, PlyError> {
        Ok(self.read_ascii_token()?.parse::<f64>()?)
    }

    fn read_row_start(&mut self) -> Result<(), PlyError> {
        loop {
            self.line.clear();
            self.pos = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Err(PlyError::UnexpectedEof);
            }
            if !self.line.trim().is_empty() {
                return Ok(());
            }
        }
    }

    fn read_row_end(&mut self) -> Result<(), PlyError> {
        let rest = self.line[self.pos..].trim();
        if !rest.is_empty() {
            warn!("Ignoring surplus values at end of ASCII record: {rest:?}");
        }
        self.line.clear();
        self.pos = 0;
        Ok(())
    }
}
