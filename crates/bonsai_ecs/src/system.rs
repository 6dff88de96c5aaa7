//! Systems and the system registry.
//!
//! A [`System`] is a named per-tick procedure over the registry. The
//! [`SystemRegistry`] keeps systems in insertion order, so update and draw
//! passes are deterministic across ticks. Systems that must observe each
//! other's effects should still be ordered explicitly by the order in which
//! they are added.

use tracing::debug;

use crate::canvas::Canvas;
use crate::registry::EntityRegistry;

/// Context provided to a system on each tick.
#[derive(Debug)]
pub struct SystemContext<'a> {
    /// The current tick ID.
    pub tick_id: u64,
    /// Delta time since the last tick, in seconds.
    pub dt: f64,
    /// The registry the system operates on.
    pub registry: &'a EntityRegistry,
}

impl<'a> SystemContext<'a> {
    /// Create a new context for a tick.
    #[must_use]
    pub fn new(tick_id: u64, dt: f64, registry: &'a EntityRegistry) -> Self {
        Self {
            tick_id,
            dt,
            registry,
        }
    }
}

/// A per-tick update/draw procedure.
pub trait System: Send {
    /// Called once before the first update.
    fn init(&mut self, _registry: &EntityRegistry) {}

    /// Advance the system by one tick.
    fn update(&mut self, ctx: &mut SystemContext<'_>);

    /// Draw debug output for this system.
    fn draw(&mut self, _registry: &EntityRegistry, _canvas: &mut dyn Canvas) {}
}

/// Insertion-ordered registry of named systems.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<(String, Box<dyn System>)>,
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemRegistry")
            .field("systems", &self.names())
            .finish()
    }
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system. A system already registered under `name` is
    /// replaced in place, keeping its position in the order.
    pub fn add(&mut self, name: impl Into<String>, system: impl System + 'static) {
        let name = name.into();
        let system: Box<dyn System> = Box::new(system);
        if let Some(slot) = self.systems.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = system;
            debug!(system = name.as_str(), "replaced system");
        } else {
            debug!(system = name.as_str(), "added system");
            self.systems.push((name, system));
        }
    }

    /// Remove a system by name. Returns `true` if it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.systems.len();
        self.systems.retain(|(n, _)| n != name);
        self.systems.len() != before
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.systems.iter().any(|(n, _)| n == name)
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Initialise every system in order.
    pub fn init_all(&mut self, registry: &EntityRegistry) {
        for (_, system) in &mut self.systems {
            system.init(registry);
        }
    }

    /// Update every system in order, skipping names in `exclude`.
    pub fn update_all(&mut self, ctx: &mut SystemContext<'_>, exclude: &[&str]) {
        for (name, system) in &mut self.systems {
            if exclude.contains(&name.as_str()) {
                continue;
            }
            system.update(ctx);
        }
    }

    /// Draw every system in order, skipping names in `exclude`.
    pub fn draw_all(&mut self, registry: &EntityRegistry, canvas: &mut dyn Canvas, exclude: &[&str]) {
        for (name, system) in &mut self.systems {
            if exclude.contains(&name.as_str()) {
                continue;
            }
            system.draw(registry, canvas);
        }
    }

    /// Update a single system. Returns `false` if no such system exists.
    pub fn update_one(&mut self, name: &str, ctx: &mut SystemContext<'_>) -> bool {
        match self.systems.iter_mut().find(|(n, _)| n == name) {
            Some((_, system)) => {
                system.update(ctx);
                true
            }
            None => false,
        }
    }

    /// Draw a single system. Returns `false` if no such system exists.
    pub fn draw_one(&mut self, name: &str, registry: &EntityRegistry, canvas: &mut dyn Canvas) -> bool {
        match self.systems.iter_mut().find(|(n, _)| n == name) {
            Some((_, system)) => {
                system.draw(registry, canvas);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bonsai_math::{DVec2, Rect, Rgba};

    use super::*;
    use crate::canvas::ShapeRecorder;

    /// Appends its label to a shared log on every update and draw.
    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl System for Recorder {
        fn init(&mut self, _registry: &EntityRegistry) {
            self.log.lock().unwrap().push(format!("init:{}", self.label));
        }

        fn update(&mut self, ctx: &mut SystemContext<'_>) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}@{}", self.label, ctx.tick_id));
        }

        fn draw(&mut self, _registry: &EntityRegistry, canvas: &mut dyn Canvas) {
            canvas.stroke_rect(Rect::new(DVec2::ZERO, DVec2::ONE), Rgba::new(0, 0, 0, 255));
        }
    }

    fn setup() -> (SystemRegistry, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut systems = SystemRegistry::new();
        for label in ["input", "ai", "physics"] {
            systems.add(
                label,
                Recorder {
                    label,
                    log: Arc::clone(&log),
                },
            );
        }
        (systems, log)
    }

    #[test]
    fn test_update_runs_in_insertion_order() {
        let (mut systems, log) = setup();
        let registry = EntityRegistry::new();
        systems.init_all(&registry);
        let mut ctx = SystemContext::new(1, 0.016, &registry);
        systems.update_all(&mut ctx, &[]);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["init:input", "init:ai", "init:physics", "input@1", "ai@1", "physics@1"]
        );
    }

    #[test]
    fn test_update_all_respects_exclude() {
        let (mut systems, log) = setup();
        let registry = EntityRegistry::new();
        let mut ctx = SystemContext::new(3, 0.016, &registry);
        systems.update_all(&mut ctx, &["ai"]);
        assert_eq!(*log.lock().unwrap(), vec!["input@3", "physics@3"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let (mut systems, log) = setup();
        systems.add(
            "input",
            Recorder {
                label: "input2",
                log: Arc::clone(&log),
            },
        );
        assert_eq!(systems.names(), vec!["input", "ai", "physics"]);
        let registry = EntityRegistry::new();
        let mut ctx = SystemContext::new(1, 0.016, &registry);
        assert!(systems.update_one("input", &mut ctx));
        assert!(!systems.update_one("missing", &mut ctx));
        assert_eq!(*log.lock().unwrap(), vec!["input2@1"]);
    }

    #[test]
    fn test_remove_and_draw() {
        let (mut systems, _) = setup();
        assert!(systems.remove("ai"));
        assert!(!systems.remove("ai"));
        assert_eq!(systems.len(), 2);

        let registry = EntityRegistry::new();
        let mut canvas = ShapeRecorder::new();
        systems.draw_all(&registry, &mut canvas, &["physics"]);
        assert_eq!(canvas.shapes.len(), 1);
        assert!(systems.draw_one("physics", &registry, &mut canvas));
        assert_eq!(canvas.shapes.len(), 2);
    }
}
