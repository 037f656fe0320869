/// Synchronous yes/no question asked of the player. Only `quit` uses it.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Asset pipeline status. The engine refuses to start until this reports
/// every required asset as loaded.
pub trait AssetLoader {
    fn all_loaded(&self) -> bool;
}

/// Loader whose readiness is a fixed flag (headless hosts, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAssets {
    pub loaded: bool,
}

impl AssetLoader for StaticAssets {
    fn all_loaded(&self) -> bool {
        self.loaded
    }
}
