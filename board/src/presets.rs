//! Built-in memory card image sets.

#[cfg(test)]
#[path = "presets_test.rs"]
mod presets_test;

/// A named set of card faces, as paths relative to the preset base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub files: &'static [&'static str],
}

pub const FRUITS: Preset = Preset {
    name: "fruits",
    files: &[
        "fruits/apple.png",
        "fruits/banana.png",
        "fruits/cherry.png",
        "fruits/grapes.png",
        "fruits/lemon.png",
        "fruits/orange.png",
        "fruits/strawberry.png",
        "fruits/pineapple.png",
        "fruits/kiwi.png",
        "fruits/watermelon.png",
        "fruits/mango.png",
        "fruits/coconut.png",
    ],
};

pub const ANIMALS: Preset = Preset {
    name: "animals",
    files: &[
        "animals/panda.png",
        "animals/fox.png",
        "animals/bear.png",
        "animals/koala.png",
        "animals/tiger.png",
        "animals/lion.png",
        "animals/cow.png",
        "animals/pig.png",
        "animals/frog.png",
        "animals/monkey.png",
        "animals/chicken.png",
        "animals/penguin.png",
    ],
};

pub const PRESETS: &[Preset] = &[FRUITS, ANIMALS];

/// Look up a preset by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

impl Preset {
    /// Full image URLs under `base_path`. A trailing slash on the base is optional.
    #[must_use]
    pub fn image_urls(&self, base_path: &str) -> Vec<String> {
        let base = base_path.trim_end_matches('/');
        self.files.iter().map(|f| format!("{base}/{f}")).collect()
    }
}
