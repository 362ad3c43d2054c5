//! Opaque kernel slots.
//!
//! Float operations, crypto operations and the vector cross product have no
//! built-in algorithm. Each of those opcodes is a slot: callers may register
//! a real implementation, and an unregistered slot falls back to a fixed
//! stand-in ([`StandIn::Identity`] for float, [`StandIn::Xor`] for crypto
//! and CROSS).
//!
//! Any `Fn(&WideWord<L>, &WideWord<L>) -> WideWord<L>` closure that is
//! `Send + Sync` is an [`OpaqueKernel`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::error::RegistrationError;
use crate::opcode::{category_of, op, Category};
use crate::word::WideWord;

/// An externally supplied `(a, b) -> result` computation.
pub trait OpaqueKernel<const L: usize>: Send + Sync {
    /// Compute the slot's result.
    fn compute(&self, a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L>;
}

impl<const L: usize, F> OpaqueKernel<L> for F
where
    F: Fn(&WideWord<L>, &WideWord<L>) -> WideWord<L> + Send + Sync,
{
    #[inline]
    fn compute(&self, a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        self(a, b)
    }
}

/// Placeholder behavior of an unregistered slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandIn {
    /// `result = a`.
    Identity,
    /// `result = a ^ b`.
    Xor,
}

impl StandIn {
    /// Stand-in for `opcode`, or `None` if the opcode is not a slot.
    pub fn for_opcode(opcode: u8) -> Option<Self> {
        match category_of(opcode) {
            Category::Float => Some(Self::Identity),
            Category::Crypto => Some(Self::Xor),
            Category::Vector if opcode == op::CROSS => Some(Self::Xor),
            _ => None,
        }
    }

    /// Apply the stand-in.
    #[inline]
    pub fn apply<const L: usize>(self, a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        match self {
            Self::Identity => *a,
            Self::Xor => *a ^ *b,
        }
    }
}

/// True when `opcode` names an opaque slot.
#[inline]
pub fn is_opaque_slot(opcode: u8) -> bool {
    StandIn::for_opcode(opcode).is_some()
}

/// Registry of caller-supplied opaque kernels, keyed by opcode.
pub struct OpaqueSlots<const L: usize> {
    kernels: BTreeMap<u8, Arc<dyn OpaqueKernel<L>>>,
}

impl<const L: usize> OpaqueSlots<L> {
    /// Empty registry; every slot uses its stand-in.
    pub fn new() -> Self {
        Self {
            kernels: BTreeMap::new(),
        }
    }

    /// Install `kernel` for `opcode`, returning the kernel it replaces.
    pub fn register<K>(
        &mut self,
        opcode: u8,
        kernel: K,
    ) -> Result<Option<Arc<dyn OpaqueKernel<L>>>, RegistrationError>
    where
        K: OpaqueKernel<L> + 'static,
    {
        if !is_opaque_slot(opcode) {
            return Err(RegistrationError::NotOpaque { opcode });
        }
        let bits = WideWord::<L>::BITS;
        debug!("registering opaque kernel for opcode {opcode:#04x} ({bits} bits)");
        Ok(self.kernels.insert(opcode, Arc::new(kernel)))
    }

    /// Remove the kernel for `opcode`, restoring its stand-in.
    pub fn unregister(&mut self, opcode: u8) -> Option<Arc<dyn OpaqueKernel<L>>> {
        self.kernels.remove(&opcode)
    }

    /// Whether a caller kernel is installed for `opcode`.
    pub fn is_registered(&self, opcode: u8) -> bool {
        self.kernels.contains_key(&opcode)
    }

    /// Run the slot for `opcode`. `None` if the opcode is not a slot.
    pub fn execute(&self, opcode: u8, a: &WideWord<L>, b: &WideWord<L>) -> Option<WideWord<L>> {
        let stand_in = StandIn::for_opcode(opcode)?;
        Some(match self.kernels.get(&opcode) {
            Some(kernel) => kernel.compute(a, b),
            None => stand_in.apply(a, b),
        })
    }
}

impl<const L: usize> Default for OpaqueSlots<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize> Clone for OpaqueSlots<L> {
    fn clone(&self) -> Self {
        Self {
            kernels: self.kernels.clone(),
        }
    }
}

impl<const L: usize> fmt::Debug for OpaqueSlots<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<String> = self.kernels.keys().map(|k| format!("{k:#04x}")).collect();
        f.debug_struct("OpaqueSlots")
            .field("registered", &registered)
            .finish()
    }
}
