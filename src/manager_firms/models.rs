use csv::StringRecord;
use crate::manager_firms::errors::FirmsError;

pub const REQUIRED_COLUMNS: [&str; 7] = ["latitude", "longitude", "acq_date", "acq_time", "satellite", "confidence", "daynight"];

/// Positions of the columns used from a FIRMS area CSV
pub struct Columns {
    pub latitude: usize,
    pub longitude: usize,
    pub acq_date: usize,
    pub acq_time: usize,
    pub satellite: usize,
    pub confidence: usize,
    pub daynight: usize,
}

impl Columns {
    /// Locates the required columns in a header row
    ///
    /// # Arguments
    ///
    /// * 'header' - the header record
    pub fn from_header(header: &StringRecord) -> Result<Columns, FirmsError> {
        let mut positions = [0usize; 7];

        for (i, column) in REQUIRED_COLUMNS.iter().enumerate() {
            positions[i] = header.iter()
                .position(|n| n == *column)
                .ok_or(FirmsError::MissingColumn(*column))?;
        }

        Ok(Columns {
            latitude: positions[0],
            longitude: positions[1],
            acq_date: positions[2],
            acq_time: positions[3],
            satellite: positions[4],
            confidence: positions[5],
            daynight: positions[6],
        })
    }
}
