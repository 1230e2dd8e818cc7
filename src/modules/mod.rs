pub mod books;

use libris_kernel::ModuleRegistry;
use libris_store::MemoryStore;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: &MemoryStore) {
    registry.register(books::create_module(store.clone()));
}
