/// Instruction sent with every comparison.
///
/// Image 1 is always the baseline ("before") and image 2 the new capture
/// ("after"); the field names must match [`ds_core::AnalysisResult`].
pub const COMPARISON_PROMPT: &str = "\
You are reviewing two photos of the same area of a room taken about a month apart.
Image 1 is the earlier photo (before). Image 2 is the new photo (after).

Identify:
1. stagnantItems: objects that are in the same position in both photos and look like they have not been put away or dealt with.
2. trashItems: new clutter, trash or mess visible in image 2 that was not in image 1.

Reply with JSON only, no commentary, in exactly this shape:
{\"stagnantItems\": [\"...\"], \"trashItems\": [\"...\"]}
Use an empty array when nothing applies.";
