//! Proof flavors for verifier generation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A verifier flavor supported by the `bb` backend.
///
/// The primary flavor writes `<name>.sol`; every other flavor writes
/// `<name>_<flavor>.sol` so several can coexist in one target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofFlavor {
    /// UltraHonk with a Keccak transcript, the EVM-friendly default.
    UltraKeccakHonk,
    /// Legacy UltraPlonk.
    UltraPlonk,
}

impl ProofFlavor {
    /// Every flavor, in generation order.
    pub const ALL: [ProofFlavor; 2] = [ProofFlavor::UltraKeccakHonk, ProofFlavor::UltraPlonk];

    /// The flavor whose verifier gets no filename suffix.
    pub const PRIMARY: ProofFlavor = ProofFlavor::UltraKeccakHonk;

    pub fn as_str(&self) -> &'static str {
        match self {
            ProofFlavor::UltraKeccakHonk => "ultra_keccak_honk",
            ProofFlavor::UltraPlonk => "ultra_plonk",
        }
    }

    pub fn is_primary(&self) -> bool {
        *self == Self::PRIMARY
    }

    /// Suffix appended to the artifact name for this flavor's verifier.
    pub fn file_suffix(&self) -> String {
        if self.is_primary() {
            String::new()
        } else {
            format!("_{}", self.as_str())
        }
    }
}

impl fmt::Display for ProofFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProofFlavor::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unsupported Noir proof flavor `{}`; expected one of: {}",
                    s,
                    ProofFlavor::ALL.map(|f| f.as_str()).join(", ")
                )
            })
    }
}

/// File name of the verifier generated for `artifact_name` in `flavor`.
pub fn verifier_file_name(artifact_name: &str, flavor: ProofFlavor) -> String {
    format!("{}{}.sol", artifact_name, flavor.file_suffix())
}
