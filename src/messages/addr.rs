//! Addr message for Bitcoin SV P2P, sharing known node addresses.

use crate::messages::message::Payload;
use crate::messages::node_addr_ex::NodeAddrEx;
use crate::util::{Error, Result, Serializable, var_int};
use std::fmt;
use std::io;
use std::io::{Read, Write};

#[cfg(feature = "async")]
use tokio::io::{AsyncRead, AsyncWrite};

/// Maximum number of addresses allowed in an Addr message.
const MAX_ADDR_COUNT: u64 = 1000;

/// Known node addresses.
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct Addr {
    /// List of addresses of known nodes.
    pub addrs: Vec<NodeAddrEx>,
}

impl Serializable<Addr> for Addr {
    fn read(reader: &mut dyn Read) -> Result<Addr> {
        let count = var_int::read(reader)?;
        if count > MAX_ADDR_COUNT {
            return Err(Error::BadData(format!("Too many addrs: {}", count)));
        }
        let mut addrs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            addrs.push(NodeAddrEx::read(reader)?);
        }
        Ok(Addr { addrs })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        var_int::write(self.addrs.len() as u64, writer)?;
        for item in &self.addrs {
            item.write(writer)?;
        }
        Ok(())
    }
}

#[cfg(feature = "async")]
impl AsyncSerializable<Addr> for Addr {
    async fn read_async(reader: &mut dyn AsyncRead) -> Result<Addr> {
        let count = var_int::read_async(reader).await?;
        if count > MAX_ADDR_COUNT {
            return Err(Error::BadData(format!("Too many addrs: {}", count)));
        }
        let mut addrs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            addrs.push(NodeAddrEx::read_async(reader).await?);
        }
        Ok(Addr { addrs })
    }

    async fn write_async(&self, writer: &mut dyn AsyncWrite) -> io::Result<()> {
        var_int::write_async(self.addrs.len() as u64, writer).await?;
        for item in &self.addrs {
            item.write_async(writer).await?;
        }
        Ok(())
    }
}

impl Payload<Addr> for Addr {
    fn size(&self) -> usize {
        var_int::size(self.addrs.len() as u64) + self.addrs.len() * NodeAddrEx::SIZE
    }
}

impl fmt::Debug for Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.addrs.len() <= 3 {
            f.debug_struct("Addr").field("addrs", &self.addrs).finish()
        } else {
            f.debug_struct("Addr")
                .field("addrs", &format!("[<{} addrs>]", self.addrs.len()))
                .finish()
        }
    }
}
