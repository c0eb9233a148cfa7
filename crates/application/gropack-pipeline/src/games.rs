use camino::Utf8Path;
use serde::Serialize;
use std::fmt;

/// Game installations recognized by the archives they ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Game {
    Engine110,
    SecondEncounter,
    Revolution,
    FirstEncounter,
}

impl Game {
    /// Probe order matters: some installations carry archives of older games.
    pub const ALL: [Game; 4] = [
        Game::Engine110,
        Game::SecondEncounter,
        Game::Revolution,
        Game::FirstEncounter,
    ];

    /// Archives whose presence identifies the game. All of them must exist.
    pub fn probes(self) -> &'static [&'static str] {
        match self {
            Game::Engine110 => &["SE1_10.gro"],
            Game::SecondEncounter => &["SE1_00.gro"],
            Game::Revolution => &["All_01.gro", "All_02.gro"],
            Game::FirstEncounter => &["1_00c.gro"],
        }
    }

    /// Archives holding the resources every installation of the game has.
    pub fn standard_archives(self) -> &'static [&'static str] {
        match self {
            Game::Engine110 => &["SE1_10.gro"],
            Game::SecondEncounter => &[
                "SE1_00.gro",
                "SE1_00_Extra.gro",
                "SE1_00_ExtraTools.gro",
                "SE1_00_Music.gro",
                "1_04_patch.gro",
                "1_07_tools.gro",
            ],
            Game::Revolution => &["All_01.gro", "All_02.gro"],
            Game::FirstEncounter => &[
                "1_00_ExtraTools.gro",
                "1_00_music.gro",
                "1_00c.gro",
                "1_00c_scripts.gro",
                "1_04_patch.gro",
            ],
        }
    }

    /// Revolution ships the alternate engine.
    pub fn is_alternate(self) -> bool {
        self == Game::Revolution
    }

    /// First Encounter releases replaced their mp3 music with ogg.
    pub fn substitutes_audio(self) -> bool {
        self == Game::FirstEncounter
    }

    pub fn name(self) -> &'static str {
        match self {
            Game::Engine110 => "Serious Engine 1.10",
            Game::SecondEncounter => "The Second Encounter",
            Game::Revolution => "Revolution",
            Game::FirstEncounter => "The First Encounter",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First game whose probe archives all exist under `root`.
pub fn detect(root: &Utf8Path) -> Option<Game> {
    Game::ALL.into_iter().find(|game| {
        game.probes()
            .iter()
            .all(|probe| root.join(probe).is_file())
    })
}
