//! MerkleBlock message for Bitcoin SV P2P, partial merkle tree for SPV filtered blocks (BIP-37).
use crate::messages::block_header::BlockHeader;
use crate::messages::message::Payload;
use crate::util::{sha256d, var_int, Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use hex;
use std::fmt;
use std::io;
use std::io::{Read, Write};
#[cfg(feature = "async")]
use tokio::io::{AsyncRead, AsyncWrite};

/// Maximum total transactions in merkle block (safety cap for large BSV blocks).
const MAX_TOTAL_TX: u64 = 10_000_000_000;

/// All-zero hash for padded or non-matched leaves.
const ZERO_HASH: Hash256 = Hash256([0u8; 32]);

/// A block header and partial merkle tree for SPV nodes to validate transactions.
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct MerkleBlock {
    /// Block header.
    pub header: BlockHeader,
    /// Number of transactions in the block.
    pub total_transactions: u32,
    /// Hashes in depth-first order.
    pub hashes: Vec<Hash256>,
    /// Bit vector used to assign hashes to nodes in the partial merkle tree.
    pub flags: Vec<u8>,
}

impl MerkleBlock {
    /// Validates the Merkle block and partial Merkle tree and returns the set of matched transactions.
    ///
    /// # Errors
    /// `Error::BadData` if no txns, invalid tree, dup tx, mismatch root/hashes/flags.
    pub fn validate(&self) -> Result<Vec<Hash256>> {
        if self.total_transactions == 0 {
            return Err(Error::BadData("No transactions".to_string()));
        }
        if self.total_transactions as u64 > MAX_TOTAL_TX {
            return Err(Error::BadData(format!("Too many transactions: {}", self.total_transactions)));
        }
        if self.hashes.is_empty() {
            return Err(Error::BadData("No hashes".to_string()));
        }
        let tree_depth = if self.total_transactions <= 1 {
            0usize
        } else {
            32 - ((self.total_transactions - 1).leading_zeros() as usize)
        };
        let padded_leaves = 1usize << tree_depth;
        let expected_flags_bytes = (padded_leaves + 7) / 8;
        if self.flags.len() < expected_flags_bytes {
            return Err(Error::BadData("Wrong flag length".to_string()));
        }
        let mut state = State {
            hash_idx: 0,
        };
        let mut matches = Vec::new();
        let (computed_root, _root_matched) = self.traverse(tree_depth, 0, &mut state, &mut matches)?;
        if computed_root != self.header.merkle_root {
            return Err(Error::BadData("Merkle proof mismatch".to_string()));
        }
        if state.hash_idx != self.hashes.len() {
            return Err(Error::BadData("Not all hashes consumed".to_string()));
        }
        // Check padded flags are 0
        for i in self.total_transactions as usize..padded_leaves {
            if self.get_flag_bit(i)? != 0 {
                return Err(Error::BadData("Padded leaf flag set".to_string()));
            }
        }
        if self.flags.len() > expected_flags_bytes {
            return Err(Error::BadData("Not all flag bits consumed".to_string()));
        }
        Ok(matches)
    }

    fn traverse(
        &self,
        level: usize,
        pos: usize,
        state: &mut State,
        matches: &mut Vec<Hash256>,
    ) -> Result<(Hash256, bool)> {
        let total = self.total_transactions as usize;
        let is_leaf = level == 0;
        if is_leaf {
            let flag = self.get_flag_bit(pos)?;
            if flag == 1 {
                let h = self.consume_hash(&mut state.hash_idx)?;
                matches.push(h.clone());
                Ok((h, true))
            } else {
                Ok((ZERO_HASH, false))
            }
        } else {
            let left_pos = pos * 2;
            let (left_hash, left_has) = self.traverse(level - 1, left_pos, state, matches)?;
            let right_pos = pos * 2 + 1;
            let (right_hash, right_has) = if right_pos < total {
                self.traverse(level - 1, right_pos, state, matches)?
            } else {
                (left_hash, left_has) // Duplication for odd
            };
            let computed = self.hash_pair(&left_hash, &right_hash);
            let has_matched = left_has || right_has;
            if right_pos < total && left_hash == right_hash && left_has && right_has {
                return Err(Error::BadData("Duplicate transactions".to_string()));
            }
            Ok((computed, has_matched))
        }
    }

    fn get_flag_bit(&self, pos: usize) -> Result<u8> {
        let byte_idx = pos / 8;
        if byte_idx >= self.flags.len() {
            return Err(Error::BadData("Flag out of range".to_string()));
        }
        let bit_pos = pos % 8;
        Ok((self.flags[byte_idx] >> bit_pos) & 1)
    }

    fn consume_hash(&self, idx: &mut usize) -> Result<Hash256> {
        if *idx >= self.hashes.len() {
            return Err(Error::BadData("Hashes exhausted".to_string()));
        }
        let h = self.hashes[*idx].clone();
        *idx += 1;
        Ok(h)
    }

    fn hash_pair(&self, a: &Hash256, b: &Hash256) -> Hash256 {
        let mut buf = [0u8; 64];
        buf[0..32].copy_from_slice(&a.0);
        buf[32..64].copy_from_slice(&b.0);
        let hashed = sha256d(&buf);
        Hash256(hashed.0)
    }
}

struct State {
    hash_idx: usize,
}

impl Serializable<MerkleBlock> for MerkleBlock {
    fn read(reader: &mut dyn Read) -> Result<MerkleBlock> {
        let header = BlockHeader::read(reader)?;
        let total_transactions = reader.read_u32::<LittleEndian>()?;
        let num_hashes = var_int::read(reader)?;
        let mut hashes = Vec::with_capacity(num_hashes as usize);
        for _ in 0..num_hashes {
            hashes.push(Hash256::read(reader)?);
        }
        let flags_len = var_int::read(reader)?;
        let mut flags = vec![0; flags_len as usize];
        reader.read_exact(&mut flags).map_err(|e| Error::IOError(e))?;
        Ok(MerkleBlock {
            header,
            total_transactions,
            hashes,
            flags,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.header.write(writer)?;
        writer.write_u32::<LittleEndian>(self.total_transactions)?;
        var_int::write(self.hashes.len() as u64, writer)?;
        for hash in &self.hashes {
            hash.write(writer)?;
        }
        var_int::write(self.flags.len() as u64, writer)?;
        writer.write_all(&self.flags)?;
        Ok(())
    }
}

impl Payload<MerkleBlock> for MerkleBlock {
    fn size(&self) -> usize {
        self.header.size() + 4 + var_int::size(self.hashes.len() as u64) + self.hashes.len() * 32 + var_int::size(self.flags.len() as u64) + self.flags.len()
    }
}

impl fmt::Debug for MerkleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MerkleBlock")
            .field("header", &self.header)
            .field("total_transactions", &self.total_transactions)
            .field("hashes", &self.hashes)
            .field("flags", &hex::encode(&self.flags))
            .finish()
    }
}
