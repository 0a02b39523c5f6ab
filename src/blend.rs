pub(crate) mod channel;
pub(crate) mod opcode;
pub(crate) mod pixel;
