//! Form element holding a lazily created list of associated controls.
//!
//! Demonstrates: a consumer that only creates its container on first use,
//! appends through `push_back`, iterates, and drops controls by id, all
//! against a counting allocator so the allocation traffic is visible.
//!
//! Run with `RUST_LOG=trace` to see every storage transition.

use tracing_subscriber::EnvFilter;
use trove_alloc::{CountingAllocator, RawAllocator, SystemAllocator};
use trove_core::{VecConfig, VecError};
use trove_vec::AllocVec;

/// Identifier of a form-associated control (input, button, select, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ControlId(u32);

/// A form that tracks the controls associated with it.
///
/// The control list is not created until the first control registers, so
/// forms without controls never touch the allocator.
struct FormElement<'a, A: RawAllocator + ?Sized> {
    name: &'static str,
    alloc: &'a A,
    controls: Option<AllocVec<'a, ControlId, A>>,
}

impl<'a, A: RawAllocator + ?Sized> FormElement<'a, A> {
    fn new(name: &'static str, alloc: &'a A) -> Self {
        Self {
            name,
            alloc,
            controls: None,
        }
    }

    fn register(&mut self, control: ControlId) -> Result<(), VecError> {
        let controls = match self.controls.take() {
            Some(controls) => controls,
            None => {
                tracing::debug!(form = self.name, "creating control list");
                AllocVec::with_config_in(VecConfig::new(4), self.alloc)?
            }
        };
        self.controls.insert(controls).push_back(control)
    }

    fn unregister(&mut self, control: ControlId) -> Option<ControlId> {
        let controls = self.controls.as_mut()?;
        let index = controls.iter().position(|&c| c == control)?;
        controls.remove_at(index).ok()
    }

    fn len(&self) -> usize {
        self.controls.as_ref().map_or(0, AllocVec::len)
    }

    fn controls(&self) -> &[ControlId] {
        self.controls
            .as_ref()
            .map(AllocVec::as_slice)
            .unwrap_or_default()
    }
}

fn main() -> Result<(), VecError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let alloc = CountingAllocator::new(SystemAllocator);

    println!("=== Trove Form Controls Example ===\n");

    let empty = FormElement::new("search", &alloc);
    println!("form '{}': {} controls", empty.name, empty.len());
    println!("  allocator traffic so far: {:?}\n", alloc.stats());

    let mut login = FormElement::new("login", &alloc);
    for id in 1..=10 {
        login.register(ControlId(id))?;
    }
    tracing::info!(form = login.name, controls = login.len(), "controls registered");
    println!("form '{}': {:?}", login.name, login.controls());

    if let Some(removed) = login.unregister(ControlId(3)) {
        println!("  unregistered {removed:?}");
    }
    if login.unregister(ControlId(99)).is_none() {
        println!("  ControlId(99) was never registered");
    }
    println!("form '{}': {:?}", login.name, login.controls());

    if let Some(controls) = login.controls.as_mut() {
        controls.shrink_to_fit()?;
        println!(
            "  after shrink_to_fit: len={} capacity={}",
            controls.len(),
            controls.capacity()
        );
    }

    let stats = alloc.stats();
    println!(
        "\nallocations={} reallocations={} releases={} live_bytes={} peak_bytes={}",
        stats.allocations,
        stats.reallocations,
        stats.releases,
        stats.live_bytes,
        stats.peak_bytes,
    );

    drop(login);
    drop(empty);
    println!("live bytes after teardown: {}", alloc.stats().live_bytes);
    Ok(())
}
