use anyhow::Result;

/// Boundary to the external archive packager.
///
/// Takes a mapping of output filename to output bytes and returns a single
/// combined archive blob. The packaging format is the collaborator's
/// concern; this crate only assembles the entry list (see
/// [`crate::processing::ProcessingEngine::package_outputs`]).
pub trait ArchivePackager {
    fn package(&self, entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>>;
}
