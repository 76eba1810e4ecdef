//! In-memory register bus used by the unit tests.

use core::convert::Infallible;

use std::collections::{BTreeMap, VecDeque};
use std::vec::Vec;

use crate::interface::RegisterInterface;

/// A 256-register fake device with scripted reads and access logging.
///
/// Reads normally come from `regs`; `queue_reads` overrides a register with
/// a consume-in-order value sequence, which is how tests model
/// self-clearing status registers and draining FIFOs.
pub(crate) struct FakeBus {
    pub regs: [u8; 256],
    pub present: bool,
    queued: BTreeMap<u8, VecDeque<u8>>,
    pub single_reads: Vec<u8>,
    pub burst_reads: Vec<(u8, usize)>,
    pub writes: Vec<(u8, u8)>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            present: true,
            queued: BTreeMap::new(),
            single_reads: Vec::new(),
            burst_reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn queue_reads(&mut self, register: u8, values: &[u8]) {
        self.queued
            .entry(register)
            .or_default()
            .extend(values.iter().copied());
    }

    pub fn reads_of(&self, register: u8) -> usize {
        self.single_reads
            .iter()
            .filter(|reg| **reg == register)
            .count()
    }

    pub fn bursts_of(&self, register: u8) -> usize {
        self.burst_reads
            .iter()
            .filter(|(reg, _)| *reg == register)
            .count()
    }

    pub fn writes_to(&self, register: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(reg, _)| *reg == register)
            .map(|(_, value)| *value)
            .collect()
    }

    fn next_value(&mut self, register: u8) -> u8 {
        if let Some(values) = self.queued.get_mut(&register) {
            if let Some(value) = values.pop_front() {
                self.regs[register as usize] = value;
                return value;
            }
        }

        self.regs[register as usize]
    }
}

impl RegisterInterface for FakeBus {
    type Error = Infallible;

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.regs[register as usize] = value;
        self.writes.push((register, value));
        Ok(())
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        self.single_reads.push(register);
        Ok(self.next_value(register))
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.burst_reads.push((register, buf.len()));
        for (index, slot) in buf.iter_mut().enumerate() {
            *slot = self.next_value(register.wrapping_add(index as u8));
        }
        Ok(())
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        for (index, value) in data.iter().enumerate() {
            let reg = register.wrapping_add(index as u8);
            self.regs[reg as usize] = *value;
            self.writes.push((reg, *value));
        }
        Ok(())
    }

    fn probe(&mut self) -> Result<bool, Self::Error> {
        Ok(self.present)
    }
}
