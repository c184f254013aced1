//! Reversible league share codes.
//! Code format: GR-<WORD><NN>, e.g., GR-BLITZ42, GR-PYLON07

const CODE_PREFIX: &str = "GR";

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "BLITZ", "PYLON", "HUDDLE", "SNAP", "SPIRAL", "GRIDIRON", "ENDZONE", "REDZONE", "FUMBLE",
    "PUNT", "KICKOFF", "SAFETY", "SACK", "AUDIBLE", "SCREEN", "SWEEP", "DRAW", "OPTION", "SLANT",
    "POST", "CORNER", "FADE", "CURL", "FLAT", "SEAM", "WHEEL", "GOALPOST", "UPRIGHT", "HASH",
    "CHAINS", "DOWNS", "TIMEOUT", "WHISTLE", "FLAG", "HELMET", "PADS", "CLEATS", "JERSEY",
    "STADIUM", "BLEACHER", "TAILGATE", "ROOKIE", "VETERAN", "CAPTAIN", "COACH", "DRAFT", "TRADE",
    "PLAYOFF", "DYNASTY", "TROPHY", "RIVALRY", "BOMB", "HAILMARY", "SNEAK", "STUFF", "SHOTGUN",
    "PISTOL", "NICKEL", "DIME", "ZONE", "PRESS", "STUNT", "TRENCH", "BACKFLD",
];

const WORD_BITS: u16 = 0x003F;

fn pack(word_index: u16, nn: u8) -> u16 {
    (word_index & WORD_BITS) | (u16::from(nn % 100) << 6)
}

fn unpack(packed: u16) -> (u16, u8) {
    let nn = u8::try_from((packed >> 6) % 100).unwrap_or(0);
    (packed & WORD_BITS, nn)
}

/// League seed for a word/number pair. The low 16 bits carry the pair so the
/// code can be recovered from the seed.
fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let [lo, hi] = packed.to_le_bytes();
    let h = fnv1a64(&[b'G', b'R', b'I', b'D', b'-', lo, hi, 0x5A]);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Share code for `seed`. Only the low 16 bits take part, so distinct seeds
/// may share a code; [`decode_to_seed`] returns the canonical one.
#[must_use]
pub fn encode_friendly(seed: u64) -> String {
    let (wi, nn) = unpack((seed & 0xFFFF) as u16);
    let word = WORD_LIST[usize::from(wi)];
    format!("{CODE_PREFIX}-{word}{nn:02}")
}

#[must_use]
pub fn decode_to_seed(code: &str) -> Option<u64> {
    let (prefix, rest) = code.trim().split_once('-')?;
    if !prefix.eq_ignore_ascii_case(CODE_PREFIX) || rest.len() < 3 || !rest.is_ascii() {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = normalize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| *w == word)?;
    Some(compose_seed(u16::try_from(idx).ok()?, nn))
}

#[must_use]
pub fn generate_code_from_entropy(entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    encode_friendly(compose_seed(wi, nn))
}

/// Accept either a plain numeric seed or a share code.
#[must_use]
pub fn parse_share_code(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| decode_to_seed(trimmed))
}
