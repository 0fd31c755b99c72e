//! Randomized job-request content. Deliberately thin: the engine only needs
//! a varied positive prompt and a style per iteration.

use gf_core::JobRequest;
use rand::Rng;

const SUBJECTS: &[&str] = &[
    "dragon",
    "cyborg",
    "pirate queen",
    "ghostly samurai",
    "dark angel",
    "robot assassin",
    "shaman warrior",
    "time traveler",
    "shadow elf",
    "demon slayer",
];

const ACTIONS: &[&str] = &[
    "casting ancient magic",
    "riding a futuristic motorcycle",
    "fighting with dual swords",
    "playing a mystical flute",
    "hacking a security system",
    "flying through the sky",
    "meditating under a cherry blossom tree",
    "escaping from a burning city",
    "exploring ancient ruins",
    "leading an army of undead",
];

const ENVIRONMENTS: &[&str] = &[
    "in a neon-lit cyber city",
    "deep in an enchanted forest",
    "on a stormy ocean",
    "inside a forgotten temple",
    "on a floating sky island",
    "in a post-apocalyptic wasteland",
    "inside a magical library",
    "on a snowy mountain peak",
    "in an alien spaceship",
    "in a medieval battlefield",
];

const MOODS: &[&str] = &[
    "with surreal dream-like aesthetics",
    "with vibrant, glowing colors",
    "in a dark, eerie atmosphere",
    "with hyper-realistic details",
    "in a psychedelic art style",
    "with soft, pastel tones",
    "in a gritty noir setting",
    "in a steampunk vibe",
    "with cinematic lighting",
    "with vintage watercolor style",
];

const STYLES: &[&str] = &[
    "anime",
    "cyberpunk",
    "realistic",
    "pixel art",
    "watercolor painting",
    "3D render",
    "vintage illustration",
    "fantasy art",
];

const NEGATIVE_PROMPT: &str =
    "malformation, bad anatomy, low quality, jpeg artifacts, watermark";

/// Draws positive prompts and styles for job requests.
///
/// When custom prompts are present, each draw uses one of them with
/// probability one half; otherwise the prompt is composed from the built-in
/// lists.
#[derive(Debug, Clone, Default)]
pub struct PromptSampler {
    custom: Vec<String>,
}

impl PromptSampler {
    pub fn new(custom: Vec<String>) -> Self {
        Self { custom }
    }

    pub fn positive_prompt(&self, rng: &mut impl Rng) -> String {
        if !self.custom.is_empty() && rng.gen_bool(0.5) {
            return pick(&self.custom, rng).clone();
        }
        format!(
            "{} {} {} {}",
            pick(SUBJECTS, rng),
            pick(ACTIONS, rng),
            pick(ENVIRONMENTS, rng),
            pick(MOODS, rng)
        )
    }

    pub fn build_request(&self, model_id: &str, rng: &mut impl Rng) -> JobRequest {
        JobRequest {
            model_id: model_id.to_string(),
            positive_prompt: self.positive_prompt(rng),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
            style_prompt: pick(STYLES, rng).to_string(),
            steps: 20,
            guidance: 7.5,
            number_of_images: 1,
        }
    }
}

fn pick<'a, T>(items: &'a [T], rng: &mut impl Rng) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
