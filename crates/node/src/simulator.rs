//! Simulation driver: builds the ring from a [SimulationConfig] and runs every lookup.
use chordsim_core::dht::ChordProtocol;
use chordsim_core::dht::ChordStorage;
use chordsim_core::dht::HasherImpl;
use chordsim_core::dht::IdentifierSpace;
use chordsim_core::dht::LookupOutcome;
use chordsim_core::dht::MemRegistry;
use chordsim_core::dht::Sha1Hasher;
use chordsim_core::inspect::ChordInspect;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::report::LookupRecord;
use crate::report::SimulationReport;

pub struct Simulator {
    config: SimulationConfig,
    chord: ChordProtocol,
}

impl Simulator {
    /// Simulator over SHA-1 hashed peers.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let space = Self::space_of(&config)?;
        Self::assemble(config, space, Box::new(Sha1Hasher::new(space)))
    }

    /// Simulator with a given hashing strategy for peers and keys.
    pub fn new_with_hasher(config: SimulationConfig, hasher: HasherImpl) -> Result<Self> {
        let space = Self::space_of(&config)?;
        Self::assemble(config, space, hasher)
    }

    fn space_of(config: &SimulationConfig) -> Result<IdentifierSpace> {
        config.validate()?;
        Ok(IdentifierSpace::new(config.m)?)
    }

    fn assemble(
        config: SimulationConfig,
        space: IdentifierSpace,
        hasher: HasherImpl,
    ) -> Result<Self> {
        let network = MemRegistry::with_names(config.node_names())?;
        let mut chord = ChordProtocol::new_with_hasher(space, hasher, network);
        if let Some(anchor) = &config.anchor {
            chord.set_anchor(anchor)?;
        }
        Ok(Self { config, chord })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Build the overlay and finger tables, then generate and place the keys.
    pub fn build(&mut self) -> Result<()> {
        tracing::info!(
            "building a ring of {} nodes over {} bits",
            self.config.node_count,
            self.config.m
        );
        self.chord.build()?;
        self.chord
            .generate_keys(&self.config.key_prefix, self.config.key_count)?;
        self.chord.assign_keys()?;
        Ok(())
    }

    /// `Node a --- Node b --- ... --- Node a`
    pub fn ring_line(&self) -> Result<String> {
        let names: Vec<String> = self
            .chord
            .ring_walk()?
            .into_iter()
            .map(|p| p.name)
            .collect();
        Ok(names.join(" --- "))
    }

    pub fn inspect(&self) -> Result<ChordInspect> {
        Ok(ChordInspect::inspect(&self.chord)?)
    }

    /// Look up every key from the anchor and check the answering peer.
    pub fn run(&self) -> Result<SimulationReport> {
        let mut records = vec![];
        for (key, outcome) in self.chord.lookup_all()? {
            let verified = match &outcome {
                LookupOutcome::Found(found) => {
                    self.chord.check_response(key.index, &found.peer_name)
                }
                LookupOutcome::Miss(_) => false,
            };
            if !verified {
                tracing::warn!("lookup failed for {} ({})", key.name, key.index);
            }
            records.push(LookupRecord {
                key,
                outcome,
                verified,
            });
        }
        let report = SimulationReport {
            node_count: self.config.node_count,
            m: self.config.m,
            records,
        };
        tracing::info!(
            "{} lookups, {} misses, {}",
            report.records.len(),
            report.misses(),
            report.summary_line()
        );
        Ok(report)
    }
}
