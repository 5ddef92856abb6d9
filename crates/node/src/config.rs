use std::fs;
use std::io;
use std::path::PathBuf;

use chordsim_core::consts::DEFAULT_IDENTIFIER_BITS;
use chordsim_core::consts::DEFAULT_KEY_PREFIX;
use chordsim_core::consts::DEFAULT_NODE_PREFIX;
use chordsim_core::consts::MAX_IDENTIFIER_BITS;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

pub const DEFAULT_CONFIG_PATH: &str = "~/.chordsim/config.yaml";
pub const DEFAULT_NODE_COUNT: usize = 10;
pub const DEFAULT_KEY_COUNT: usize = 100;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

fn default_node_prefix() -> String {
    DEFAULT_NODE_PREFIX.to_string()
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub node_count: usize,
    pub key_count: usize,
    /// Identifier length in bits.
    pub m: u32,
    pub output_dir: String,
    /// Peer every lookup starts from. The first peer when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default = "default_node_prefix")]
    pub node_prefix: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            key_count: DEFAULT_KEY_COUNT,
            m: DEFAULT_IDENTIFIER_BITS,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            anchor: None,
            node_prefix: default_node_prefix(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl SimulationConfig {
    /// Reject configs the ring cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.m == 0 || self.m > MAX_IDENTIFIER_BITS {
            return Err(Error::InvalidConfig(format!(
                "m must be within 1..={}, got {}",
                MAX_IDENTIFIER_BITS, self.m
            )));
        }
        if self.node_count == 0 {
            return Err(Error::InvalidConfig("node_count must be positive".to_string()));
        }
        if self.node_count as u128 > 1u128 << self.m {
            return Err(Error::InvalidConfig(format!(
                "{} nodes do not fit a ring of 2^{} identifiers",
                self.node_count, self.m
            )));
        }
        Ok(())
    }

    /// Names of the simulated peers, `{node_prefix}1` to `{node_prefix}{node_count}`.
    pub fn node_names(&self) -> Vec<String> {
        (1..=self.node_count)
            .map(|i| format!("{}{}", self.node_prefix, i))
            .collect()
    }

    /// `<output_dir>/output_<N>_nodes_m<m>.txt`
    pub fn output_file(&self) -> Result<PathBuf> {
        let dir = expand_home(&self.output_dir)?;
        Ok(dir.join(format!(
            "output_{}_nodes_m{}.txt",
            self.node_count, self.m
        )))
    }

    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self)?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn read_fs<P>(path: P) -> Result<SimulationConfig>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        Ok(serde_yaml::from_reader(f_rdr)?)
    }
}
