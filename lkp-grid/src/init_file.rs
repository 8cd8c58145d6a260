/// Initial-condition file writer.
///
/// One row per profile depth, tab separated, in the simulator's fixed
/// 31-column order: depth, area, temperature, placeholder state variables,
/// oxygen, more placeholders. The phosphorus and chlorophyll seed values
/// are the fixed literature defaults carried over from the original
/// configuration.
use crate::bathymetry::BathymetryGrid;
use crate::profile::VariableProfile;
use lkp_core::error::{LakeError, Result};
use log::info;
use std::io::Write;

const HEADER: &str = "skip
Z (m)\tAz (m2)\tTz (deg C)\tCz (mg/m3)\tPOCz (mg/m3)\tTPz (mg/m3)\tDOPz (mg/m3)\tChlaz (mg/m3)\tDOCz (mg/m3)\tTPz_sed (mg/m3)\tChlaz_sed (mg/m3)\tFvol_IM (m3/m3, dry w.)\tHice (m)\tHsnow (m)\tO2z (mg/m3)\tDICz (mg/m3)\tNO3z (mg/m3)\tNH4z (mg/m3)\tSO4z (mg/m3)\tHSz (mg/m3)\tH2Sz (mg/m3)\tFe2z (mg/m3)\tCa2z (mg/m3)\tpHz (mg/m3)\tCH4aqz (mg/m3)\tFe3z (mg/m3)\tAl3z (mg/m3)\tFeSz (mg/m3)\tCaCO3z (mg/m3)\tCH4gz (mg/m3)\tPOPz (mg/m3)";

/// Render the initial-condition table as a string.
pub fn render_init_table(
    grid: &BathymetryGrid,
    temperature: &VariableProfile,
    oxygen: &VariableProfile,
) -> Result<String> {
    if temperature.values.len() != grid.depths.len() || oxygen.values.len() != grid.depths.len() {
        return Err(LakeError::InvalidFormat(format!(
            "profile length mismatch: {} depths, {} temperature, {} oxygen",
            grid.depths.len(),
            temperature.values.len(),
            oxygen.values.len()
        )));
    }

    let mut lines = vec![HEADER.to_string()];
    for (i, (&depth, &area)) in grid.depths.iter().zip(grid.areas.iter()).enumerate() {
        let mut cells: Vec<String> = vec![
            format!("{depth:.2}"),
            format!("{area:.0}"),
            format!("{:.2}", temperature.values[i]),
        ];
        // Cz, POCz, then TP/DOP/Chla seed values
        cells.extend(["0", "0", "200", "4", "11"].map(String::from));
        // DOCz .. Hsnow
        cells.extend(std::iter::repeat("0".to_string()).take(6));
        cells.push(format!("{:.2}", oxygen.values[i]));
        // DICz .. pHz
        cells.extend(std::iter::repeat("0".to_string()).take(9));
        // CH4aqz .. POPz
        cells.extend(std::iter::repeat("0".to_string()).take(7));
        lines.push(cells.join("\t"));
    }
    Ok(lines.join("\n"))
}

/// Write the initial-condition file to disk.
pub fn write_init_file(
    path: &std::path::Path,
    grid: &BathymetryGrid,
    temperature: &VariableProfile,
    oxygen: &VariableProfile,
) -> Result<()> {
    let table = render_init_table(grid, temperature, oxygen)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(table.as_bytes())?;
    info!("wrote {} initial-condition rows to {}", grid.depths.len(), path.display());
    Ok(())
}
