//! Fixed source-to-target joint name table.
//!
//! The motion source uses a `*_JNT` skeleton; the character is a VRM humanoid
//! with `J_Bip_*` joints. Lookup is the whole contract: a missing entry means
//! "drop this track", never an error.

use hashbrown::HashMap;
use serde::{Deserialize, Deserializer};

use crate::error::BoneMapError;

/// Motion-capture joint -> VRM humanoid joint.
pub const STANDARD_BONE_PAIRS: &[(&str, &str)] = &[
    // Torso and head
    ("hips_JNT", "J_Bip_C_Hips"),
    ("spine1_JNT", "J_Bip_C_Spine"),
    ("spine2_JNT", "J_Bip_C_Chest"),
    ("spine3_JNT", "J_Bip_C_UpperChest"),
    ("neck_JNT", "J_Bip_C_Neck"),
    ("head_JNT", "J_Bip_C_Head"),
    ("l_eye_JNT", "J_Adj_L_FaceEye"),
    ("r_eye_JNT", "J_Adj_R_FaceEye"),
    // Left arm
    ("l_shoulder_JNT", "J_Bip_L_Shoulder"),
    ("l_arm_JNT", "J_Bip_L_UpperArm"),
    ("l_forearm_JNT", "J_Bip_L_LowerArm"),
    ("l_hand_JNT", "J_Bip_L_Hand"),
    ("l_handThumb1_JNT", "J_Bip_L_Thumb1"),
    ("l_handThumb2_JNT", "J_Bip_L_Thumb2"),
    ("l_handThumb3_JNT", "J_Bip_L_Thumb3"),
    ("l_handIndex1_JNT", "J_Bip_L_Index1"),
    ("l_handIndex2_JNT", "J_Bip_L_Index2"),
    ("l_handIndex3_JNT", "J_Bip_L_Index3"),
    ("l_handMiddle1_JNT", "J_Bip_L_Middle1"),
    ("l_handMiddle2_JNT", "J_Bip_L_Middle2"),
    ("l_handMiddle3_JNT", "J_Bip_L_Middle3"),
    ("l_handRing1_JNT", "J_Bip_L_Ring1"),
    ("l_handRing2_JNT", "J_Bip_L_Ring2"),
    ("l_handRing3_JNT", "J_Bip_L_Ring3"),
    ("l_handPinky1_JNT", "J_Bip_L_Little1"),
    ("l_handPinky2_JNT", "J_Bip_L_Little2"),
    ("l_handPinky3_JNT", "J_Bip_L_Little3"),
    // Right arm
    ("r_shoulder_JNT", "J_Bip_R_Shoulder"),
    ("r_arm_JNT", "J_Bip_R_UpperArm"),
    ("r_forearm_JNT", "J_Bip_R_LowerArm"),
    ("r_hand_JNT", "J_Bip_R_Hand"),
    ("r_handThumb1_JNT", "J_Bip_R_Thumb1"),
    ("r_handThumb2_JNT", "J_Bip_R_Thumb2"),
    ("r_handThumb3_JNT", "J_Bip_R_Thumb3"),
    ("r_handIndex1_JNT", "J_Bip_R_Index1"),
    ("r_handIndex2_JNT", "J_Bip_R_Index2"),
    ("r_handIndex3_JNT", "J_Bip_R_Index3"),
    ("r_handMiddle1_JNT", "J_Bip_R_Middle1"),
    ("r_handMiddle2_JNT", "J_Bip_R_Middle2"),
    ("r_handMiddle3_JNT", "J_Bip_R_Middle3"),
    ("r_handRing1_JNT", "J_Bip_R_Ring1"),
    ("r_handRing2_JNT", "J_Bip_R_Ring2"),
    ("r_handRing3_JNT", "J_Bip_R_Ring3"),
    ("r_handPinky1_JNT", "J_Bip_R_Little1"),
    ("r_handPinky2_JNT", "J_Bip_R_Little2"),
    ("r_handPinky3_JNT", "J_Bip_R_Little3"),
    // Left leg
    ("l_upleg_JNT", "J_Bip_L_UpperLeg"),
    ("l_leg_JNT", "J_Bip_L_LowerLeg"),
    ("l_foot_JNT", "J_Bip_L_Foot"),
    ("l_toebase_JNT", "J_Bip_L_ToeBase"),
    // Right leg
    ("r_upleg_JNT", "J_Bip_R_UpperLeg"),
    ("r_leg_JNT", "J_Bip_R_LowerLeg"),
    ("r_foot_JNT", "J_Bip_R_Foot"),
    ("r_toebase_JNT", "J_Bip_R_ToeBase"),
];

/// Read-only joint name lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoneMap {
    map: HashMap<String, String>,
}

impl BoneMap {
    /// The table shipped with the demo.
    pub fn standard() -> Self {
        // Key uniqueness is covered by `standard_table_has_unique_keys`.
        let map = STANDARD_BONE_PAIRS
            .iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();
        Self { map }
    }

    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self, BoneMapError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut map = HashMap::new();
        for (source, target) in pairs {
            let (source, target) = (source.into(), target.into());
            if source.is_empty() || target.is_empty() {
                return Err(BoneMapError::EmptyIdentifier);
            }
            if map.contains_key(&source) {
                return Err(BoneMapError::DuplicateKey(source));
            }
            map.insert(source, target);
        }
        Ok(Self { map })
    }

    /// Target joint for `source`, if the table has one.
    #[inline]
    pub fn resolve(&self, source: &str) -> Option<&str> {
        self.map.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl Default for BoneMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for BoneMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Duplicate JSON keys collapse in the map; only empties can fail here.
        let raw: HashMap<String, String> = HashMap::deserialize(deserializer)?;
        BoneMap::from_pairs(raw).map_err(serde::de::Error::custom)
    }
}
