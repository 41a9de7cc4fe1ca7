// src/audio.rs - Sample playback behind a small engine trait
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Source};
use tracing::{info, warn};

use crate::error::{DrumError, Result};
use crate::zones::{DrumZone, ZoneMap};

/// Index of a sample loaded into an [`AudioEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub usize);

pub trait AudioEngine {
    /// Loads and decodes a sample. Called at startup only.
    fn load_sound(&mut self, path: &Path) -> Result<SoundHandle>;

    /// Starts playback and returns immediately. Overlapping calls mix.
    fn play(&mut self, sound: SoundHandle, volume: f32);
}

impl<A: AudioEngine + ?Sized> AudioEngine for Box<A> {
    fn load_sound(&mut self, path: &Path) -> Result<SoundHandle> {
        (**self).load_sound(path)
    }

    fn play(&mut self, sound: SoundHandle, volume: f32) {
        (**self).play(sound, volume)
    }
}

type Sample = Buffered<Decoder<BufReader<File>>>;

/// Plays samples on the default output device.
pub struct RodioEngine {
    // The stream must outlive every handle that plays into it.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    samples: Vec<Sample>,
}

impl RodioEngine {
    pub fn new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| DrumError::AudioDevice(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            handle,
            samples: Vec::new(),
        })
    }
}

impl AudioEngine for RodioEngine {
    fn load_sound(&mut self, path: &Path) -> Result<SoundHandle> {
        let sound_load = |reason: String| DrumError::SoundLoad {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| sound_load(e.to_string()))?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| sound_load(e.to_string()))?;

        self.samples.push(decoder.buffered());
        Ok(SoundHandle(self.samples.len() - 1))
    }

    fn play(&mut self, sound: SoundHandle, volume: f32) {
        let Some(sample) = self.samples.get(sound.0) else {
            warn!("Unknown sound handle {:?}", sound);
            return;
        };

        let source = sample.clone().amplify(volume).convert_samples::<f32>();
        if let Err(e) = self.handle.play_raw(source) {
            warn!("Playback failed: {}", e);
        }
    }
}

/// Sound handle for every zone of a [`ZoneMap`], resolved at startup.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    handles: [Option<SoundHandle>; DrumZone::COUNT],
}

impl SoundBank {
    /// Loads the sample for each zone in `zones` from `table`. The first
    /// zone without an entry or whose sample fails to load aborts the load.
    pub fn load<A: AudioEngine>(
        engine: &mut A,
        zones: &ZoneMap,
        table: &[(DrumZone, PathBuf)],
    ) -> Result<Self> {
        let mut bank = Self::default();

        for zone in zones.iter() {
            let path = table
                .iter()
                .find(|(id, _)| *id == zone.id)
                .map(|(_, path)| path)
                .ok_or(DrumError::MissingSound(zone.id))?;

            let handle = engine.load_sound(path)?;
            info!("Loaded {} sample from {}", zone.id, path.display());
            bank.handles[zone.id.index()] = Some(handle);
        }

        Ok(bank)
    }

    pub fn handle(&self, zone: DrumZone) -> Option<SoundHandle> {
        self.handles[zone.index()]
    }

    pub fn bind(&mut self, zone: DrumZone, handle: SoundHandle) {
        self.handles[zone.index()] = Some(handle);
    }
}
