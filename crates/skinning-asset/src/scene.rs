#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneAsset {
    pub name: Option<String>,
    pub roots: Vec<usize>,
}
