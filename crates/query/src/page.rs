use anyhow::anyhow;
use axh_storage::RowKey;
use borsh::{BorshDeserialize, BorshSerialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;


/// Opaque continuation token. Encodes where the previous call stopped so a
/// follow-up call resumes the same logical scan with no duplicates and no
/// gaps.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Eq, PartialEq)]
pub struct PageToken {
    pub(crate) address_pos: u32,
    pub(crate) last_row: RowKey
}


impl Display for PageToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&faster_hex::hex_string(&borsh::to_vec(self).unwrap()))
    }
}


impl FromStr for PageToken {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = vec![0; s.len() / 2];
        faster_hex::hex_decode(s.as_bytes(), &mut bytes)
            .map_err(|_| anyhow!("malformed page token"))?;
        Ok(borsh::from_slice(&bytes)?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn token_round_trips_through_display() {
        let token = PageToken {
            address_pos: 3,
            last_row: "1:I:aa:999999899:00002:00000".to_string()
        };
        let parsed: PageToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!("zz".parse::<PageToken>().is_err());
        assert!("00ff".parse::<PageToken>().is_err());
    }
}
