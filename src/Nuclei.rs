/// Periodic table: Z, symbol and name of every element, plus the free neutron.
pub mod elements;
/// Identity of a nuclide.
///
///  # Examples
/// ```
/// use NucRates::Nuclei::nucleus::Nucleus;
/// let alpha = Nucleus::from_name("a").unwrap();
/// assert_eq!(alpha, Nucleus::from_za(2, 4).unwrap());
/// assert_eq!(alpha.name(), "he4");
/// assert_eq!(alpha.spec_name(), "helium-4");
/// ```
pub mod nucleus;
/// Spins and mass excesses loaded from an external table and attached to
/// nuclei on request. Required by detailed balance (derived reverse rates).
pub mod nuclide_table;
