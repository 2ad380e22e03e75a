//! Decoding (and encoding) of the instructions in a method's code array
//!
//! Only instructions with constant pool operands are decoded in full, since those are the ones
//! that refer to other classes and members. Everything else is kept as its opcode.

use crate::jvm::class_file::ConstantIndex;
use crate::jvm::Error;
use byteorder::{BigEndian, WriteBytesExt};

/// Opcodes which get special treatment
pub mod opcode {
    pub const NOP: u8 = 0x00;
    pub const ACONST_NULL: u8 = 0x01;
    pub const ICONST_0: u8 = 0x03;
    pub const LDC: u8 = 0x12;
    pub const LDC_W: u8 = 0x13;
    pub const LDC2_W: u8 = 0x14;
    pub const ALOAD_0: u8 = 0x2a;
    pub const ALOAD_1: u8 = 0x2b;
    pub const POP: u8 = 0x57;
    pub const DUP: u8 = 0x59;
    pub const IINC: u8 = 0x84;
    pub const TABLESWITCH: u8 = 0xaa;
    pub const LOOKUPSWITCH: u8 = 0xab;
    pub const IRETURN: u8 = 0xac;
    pub const ARETURN: u8 = 0xb0;
    pub const RETURN: u8 = 0xb1;
    pub const GETSTATIC: u8 = 0xb2;
    pub const PUTSTATIC: u8 = 0xb3;
    pub const GETFIELD: u8 = 0xb4;
    pub const PUTFIELD: u8 = 0xb5;
    pub const INVOKEVIRTUAL: u8 = 0xb6;
    pub const INVOKESPECIAL: u8 = 0xb7;
    pub const INVOKESTATIC: u8 = 0xb8;
    pub const INVOKEINTERFACE: u8 = 0xb9;
    pub const INVOKEDYNAMIC: u8 = 0xba;
    pub const NEW: u8 = 0xbb;
    pub const ANEWARRAY: u8 = 0xbd;
    pub const ATHROW: u8 = 0xbf;
    pub const CHECKCAST: u8 = 0xc0;
    pub const INSTANCEOF: u8 = 0xc1;
    pub const WIDE: u8 = 0xc4;
    pub const MULTIANEWARRAY: u8 = 0xc5;
}

/// Instruction, with constant pool operands decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `ldc` or `ldc_w`
    Ldc(ConstantIndex),
    Ldc2W(ConstantIndex),

    GetStatic(ConstantIndex),
    PutStatic(ConstantIndex),
    GetField(ConstantIndex),
    PutField(ConstantIndex),

    InvokeVirtual(ConstantIndex),
    InvokeSpecial(ConstantIndex),
    InvokeStatic(ConstantIndex),
    InvokeInterface { method: ConstantIndex, count: u8 },
    InvokeDynamic(ConstantIndex),

    New(ConstantIndex),
    ANewArray(ConstantIndex),
    CheckCast(ConstantIndex),
    InstanceOf(ConstantIndex),
    MultiANewArray { class: ConstantIndex, dimensions: u8 },

    /// Any instruction whose operands don't point into the constant pool
    Other(u8),
}

impl Instruction {
    /// Class constant operand, for instructions which take a class
    pub fn class_operand(&self) -> Option<ConstantIndex> {
        match self {
            Instruction::New(class)
            | Instruction::ANewArray(class)
            | Instruction::CheckCast(class)
            | Instruction::InstanceOf(class)
            | Instruction::MultiANewArray { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Encode the instruction (not valid for `Other` opcodes that have operands)
    pub fn encode<W: WriteBytesExt>(&self, writer: &mut W) -> Result<(), Error> {
        let with_index = |writer: &mut W, op: u8, idx: &ConstantIndex| -> std::io::Result<()> {
            writer.write_u8(op)?;
            writer.write_u16::<BigEndian>(idx.0)
        };
        match self {
            Instruction::Ldc(idx) => match u8::try_from(idx.0) {
                Ok(narrow) => {
                    writer.write_u8(opcode::LDC)?;
                    writer.write_u8(narrow)?;
                }
                Err(_) => with_index(writer, opcode::LDC_W, idx)?,
            },
            Instruction::Ldc2W(idx) => with_index(writer, opcode::LDC2_W, idx)?,
            Instruction::GetStatic(idx) => with_index(writer, opcode::GETSTATIC, idx)?,
            Instruction::PutStatic(idx) => with_index(writer, opcode::PUTSTATIC, idx)?,
            Instruction::GetField(idx) => with_index(writer, opcode::GETFIELD, idx)?,
            Instruction::PutField(idx) => with_index(writer, opcode::PUTFIELD, idx)?,
            Instruction::InvokeVirtual(idx) => with_index(writer, opcode::INVOKEVIRTUAL, idx)?,
            Instruction::InvokeSpecial(idx) => with_index(writer, opcode::INVOKESPECIAL, idx)?,
            Instruction::InvokeStatic(idx) => with_index(writer, opcode::INVOKESTATIC, idx)?,
            Instruction::InvokeInterface { method, count } => {
                with_index(writer, opcode::INVOKEINTERFACE, method)?;
                writer.write_u8(*count)?;
                writer.write_u8(0)?;
            }
            Instruction::InvokeDynamic(idx) => {
                with_index(writer, opcode::INVOKEDYNAMIC, idx)?;
                writer.write_u16::<BigEndian>(0)?;
            }
            Instruction::New(idx) => with_index(writer, opcode::NEW, idx)?,
            Instruction::ANewArray(idx) => with_index(writer, opcode::ANEWARRAY, idx)?,
            Instruction::CheckCast(idx) => with_index(writer, opcode::CHECKCAST, idx)?,
            Instruction::InstanceOf(idx) => with_index(writer, opcode::INSTANCEOF, idx)?,
            Instruction::MultiANewArray { class, dimensions } => {
                with_index(writer, opcode::MULTIANEWARRAY, class)?;
                writer.write_u8(*dimensions)?;
            }
            Instruction::Other(op) => match fixed_length(*op) {
                Some(1) => writer.write_u8(*op)?,
                _ => return Err(Error::UnknownOpcode { opcode: *op, offset: 0 }),
            },
        }
        Ok(())
    }
}

/// Length of instructions whose length doesn't depend on where they are or what follows them
fn fixed_length(op: u8) -> Option<usize> {
    match op {
        0x00..=0x0f | 0x1a..=0x35 | 0x3b..=0x83 | 0x85..=0x98 | 0xac..=0xb1 => Some(1),
        0xbe | 0xbf | 0xc2 | 0xc3 | 0xca | 0xfe | 0xff => Some(1),
        0x10 | 0x12 | 0x15..=0x19 | 0x36..=0x3a | 0xa9 | 0xbc => Some(2),
        0x11 | 0x13 | 0x14 | 0x84 | 0x99..=0xa8 | 0xb2..=0xb8 | 0xbb | 0xbd => Some(3),
        0xc0 | 0xc1 | 0xc6 | 0xc7 => Some(3),
        0xc5 => Some(4),
        0xb9 | 0xba | 0xc8 | 0xc9 => Some(5),
        _ => None,
    }
}

/// Iterator over the instructions in a code array, yielding each one with its offset
///
/// Iteration stops after the first error.
pub struct Instructions<'a> {
    code: &'a [u8],
    pc: usize,
    failed: bool,
}

impl<'a> Instructions<'a> {
    pub fn new(code: &'a [u8]) -> Instructions<'a> {
        Instructions {
            code,
            pc: 0,
            failed: false,
        }
    }

    fn read_u8(&self, at: usize) -> Result<u8, Error> {
        self.code.get(at).copied().ok_or(Error::TruncatedCode(self.pc))
    }

    fn read_u16(&self, at: usize) -> Result<u16, Error> {
        Ok(u16::from_be_bytes([self.read_u8(at)?, self.read_u8(at + 1)?]))
    }

    fn read_i32(&self, at: usize) -> Result<i32, Error> {
        Ok(i32::from_be_bytes([
            self.read_u8(at)?,
            self.read_u8(at + 1)?,
            self.read_u8(at + 2)?,
            self.read_u8(at + 3)?,
        ]))
    }

    /// Length of the instruction at the current offset
    fn length(&self, op: u8) -> Result<usize, Error> {
        if let Some(len) = fixed_length(op) {
            return Ok(len);
        }
        let pc = self.pc;
        let padding = (4 - (pc + 1) % 4) % 4;
        match op {
            opcode::WIDE => Ok(if self.read_u8(pc + 1)? == opcode::IINC {
                6
            } else {
                4
            }),
            opcode::TABLESWITCH => {
                let low = self.read_i32(pc + 1 + padding + 4)? as i64;
                let high = self.read_i32(pc + 1 + padding + 8)? as i64;
                let entries = usize::try_from(high - low + 1)
                    .map_err(|_| Error::TruncatedCode(pc))?;
                Ok(1 + padding + 12 + entries * 4)
            }
            opcode::LOOKUPSWITCH => {
                let pairs = self.read_i32(pc + 1 + padding + 4)?;
                let pairs = usize::try_from(pairs).map_err(|_| Error::TruncatedCode(pc))?;
                Ok(1 + padding + 8 + pairs * 8)
            }
            _ => Err(Error::UnknownOpcode { opcode: op, offset: pc }),
        }
    }

    fn decode(&self, op: u8) -> Result<Instruction, Error> {
        let pc = self.pc;
        let index = || self.read_u16(pc + 1).map(ConstantIndex);
        let instruction = match op {
            opcode::LDC => Instruction::Ldc(ConstantIndex(self.read_u8(pc + 1)? as u16)),
            opcode::LDC_W => Instruction::Ldc(index()?),
            opcode::LDC2_W => Instruction::Ldc2W(index()?),
            opcode::GETSTATIC => Instruction::GetStatic(index()?),
            opcode::PUTSTATIC => Instruction::PutStatic(index()?),
            opcode::GETFIELD => Instruction::GetField(index()?),
            opcode::PUTFIELD => Instruction::PutField(index()?),
            opcode::INVOKEVIRTUAL => Instruction::InvokeVirtual(index()?),
            opcode::INVOKESPECIAL => Instruction::InvokeSpecial(index()?),
            opcode::INVOKESTATIC => Instruction::InvokeStatic(index()?),
            opcode::INVOKEINTERFACE => Instruction::InvokeInterface {
                method: index()?,
                count: self.read_u8(pc + 3)?,
            },
            opcode::INVOKEDYNAMIC => Instruction::InvokeDynamic(index()?),
            opcode::NEW => Instruction::New(index()?),
            opcode::ANEWARRAY => Instruction::ANewArray(index()?),
            opcode::CHECKCAST => Instruction::CheckCast(index()?),
            opcode::INSTANCEOF => Instruction::InstanceOf(index()?),
            opcode::MULTIANEWARRAY => Instruction::MultiANewArray {
                class: index()?,
                dimensions: self.read_u8(pc + 3)?,
            },
            other => Instruction::Other(other),
        };
        Ok(instruction)
    }

    fn step(&mut self) -> Result<(usize, Instruction), Error> {
        let op = self.read_u8(self.pc)?;
        let len = self.length(op)?;
        if self.pc + len > self.code.len() {
            return Err(Error::TruncatedCode(self.pc));
        }
        let instruction = self.decode(op)?;
        let offset = self.pc;
        self.pc += len;
        Ok((offset, instruction))
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<(usize, Instruction), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pc >= self.code.len() {
            return None;
        }
        let result = self.step();
        self.failed = result.is_err();
        Some(result)
    }
}
