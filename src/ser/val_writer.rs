use std::fmt::Display;
use std::io::Write;
use std::marker::PhantomData;

use byteorder::ByteOrder;
use byteorder::WriteBytesExt;

use crate::{PlyError, ScalarValue};

pub struct BinValWriter<W: Write, E: ByteOrder> {
    writer: W,
    _endian: PhantomData<E>,
}

impl<W: Write, E: ByteOrder> BinValWriter<W, E> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            _endian: PhantomData,
        }
    }
}

pub struct AsciiValWriter<W: Write> {
    writer: W,
    row_empty: bool,
}

impl<W: Write> AsciiValWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            row_empty: true,
        }
    }

    fn write_token(&mut self, val: impl Display) -> Result<(), PlyError> {
        if self.row_empty {
            write!(self.writer, "{val}")?;
        } else {
            write!(self.writer, " {val}")?;
        }
        self.row_empty = false;
        Ok(())
    }
}

pub trait ScalarWriter {
    fn write_i8(&mut self, val: i8) -> Result<(), PlyError>;
    fn write_u8(&mut self, val: u8) -> Result<(), PlyError>;
    fn write_i16(&mut self, val: i16) -> Result<(), PlyError>;
    fn write_u16(&mut self, val: u16) -> Result<(), PlyError>;
    fn write_i32(&mut self, val: i32) -> Result<(), PlyError>;
    fn write_u32(&mut self, val: u32) -> Result<(), PlyError>;
    fn write_f32(&mut self, val: f32) -> Result<(), PlyError>;
    fn write_f64(&mut self, val: f64) -> Result<(), PlyError>;

    fn write_row_end(&mut self) -> Result<(), PlyError>;

    fn write_scalar(&mut self, val: ScalarValue) -> Result<(), PlyError> {
        match val {
            ScalarValue::I8(v) => self.write_i8(v),
            ScalarValue::U8(v) => self.write_u8(v),
            ScalarValue::I16(v) => self.write_i16(v),
            ScalarValue::U16(v) => self.write_u16(v),
            ScalarValue::I32(v) => self.write_i32(v),
            ScalarValue::U32(v) => self.write_u32(v),
            ScalarValue::F32(v) => self.write_f32(v),
            ScalarValue::F64(v) => self.write_f64(v),
        }
    }
}

impl<W: Write, E: ByteOrder> ScalarWriter for BinValWriter<W, E> {
    fn write_i8(&mut self, val: i8) -> Result<(), PlyError> {
        Ok(self.writer.write_i8(val)?)
    }

    fn write_u8(&mut self, val: u8) -> Result<(), PlyError> {
        Ok(self.writer.write_u8(val)?)
    }

    fn write_i16(&mut self, val: i16) -> Result<(), PlyError> {
        Ok(self.writer.write_i16::<E>(val)?)
    }

    fn write_u16(&mut self, val: u16) -> Result<(), PlyError> {
        Ok(self.writer.write_u16::<E>(val)?)
    }

    fn write_i32(&mut self, val: i32) -> Result<(), PlyError> {
        Ok(self.writer.write_i32::<E>(val)?)
    }

    fn write_u32(&mut self, val: u32) -> Result<(), PlyError> {
        Ok(self.writer.write_u32::<E>(val)?)
    }

    fn write_f32(&mut self, val: f32) -> Result<(), PlyError> {
        Ok(self.writer.write_f32::<E>(val)?)
    }

    fn write_f64(&mut self, val: f64) -> Result<(), PlyError> {
        Ok(self.writer.write_f64::<E>(val)?)
    }

    fn write_row_end(&mut self) -> Result<(), PlyError> {
        Ok(())
    }
}

impl<W: Write> ScalarWriter for AsciiValWriter<W> {
    fn write_i8(&mut self, val: i8) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_u8(&mut self, val: u8) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_i16(&mut self, val: i16) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_u16(&mut self, val: u16) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_i32(&mut self, val: i32) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_u32(&mut self, val: u32) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_f32(&mut self, val: f32) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_f64(&mut self, val: f64) -> Result<(), PlyError> {
        self.write_token(val)
    }

    fn write_row_end(&mut self) -> Result<(), PlyError> {
        writeln!(self.writer)?;
        self.row_empty = true;
        Ok(())
    }
}
