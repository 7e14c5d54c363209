//! Periodic table used to resolve nuclide symbols.
//!
//! Only identity data lives here (Z, symbol, name). Spins and mass excesses
//! come from an injected [`super::nuclide_table::NuclideTable`].

// Define a struct to hold element data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub z: u32,
    pub symbol: &'static str,
    pub name: &'static str,
}

/// the free neutron is kept apart from the table: it has Z = 0 and only A = 1
pub const NEUTRON: Element = Element {
    z: 0,
    symbol: "n",
    name: "neutron",
};

// Define a list of elements ordered by atomic number
pub const ELEMENTS: &[Element] = &[
    Element { z: 1, symbol: "H", name: "hydrogen" },
    Element { z: 2, symbol: "He", name: "helium" },
    Element { z: 3, symbol: "Li", name: "lithium" },
    Element { z: 4, symbol: "Be", name: "beryllium" },
    Element { z: 5, symbol: "B", name: "boron" },
    Element { z: 6, symbol: "C", name: "carbon" },
    Element { z: 7, symbol: "N", name: "nitrogen" },
    Element { z: 8, symbol: "O", name: "oxygen" },
    Element { z: 9, symbol: "F", name: "fluorine" },
    Element { z: 10, symbol: "Ne", name: "neon" },
    Element { z: 11, symbol: "Na", name: "sodium" },
    Element { z: 12, symbol: "Mg", name: "magnesium" },
    Element { z: 13, symbol: "Al", name: "aluminum" },
    Element { z: 14, symbol: "Si", name: "silicon" },
    Element { z: 15, symbol: "P", name: "phosphorus" },
    Element { z: 16, symbol: "S", name: "sulfur" },
    Element { z: 17, symbol: "Cl", name: "chlorine" },
    Element { z: 18, symbol: "Ar", name: "argon" },
    Element { z: 19, symbol: "K", name: "potassium" },
    Element { z: 20, symbol: "Ca", name: "calcium" },
    Element { z: 21, symbol: "Sc", name: "scandium" },
    Element { z: 22, symbol: "Ti", name: "titanium" },
    Element { z: 23, symbol: "V", name: "vanadium" },
    Element { z: 24, symbol: "Cr", name: "chromium" },
    Element { z: 25, symbol: "Mn", name: "manganese" },
    Element { z: 26, symbol: "Fe", name: "iron" },
    Element { z: 27, symbol: "Co", name: "cobalt" },
    Element { z: 28, symbol: "Ni", name: "nickel" },
    Element { z: 29, symbol: "Cu", name: "copper" },
    Element { z: 30, symbol: "Zn", name: "zinc" },
    Element { z: 31, symbol: "Ga", name: "gallium" },
    Element { z: 32, symbol: "Ge", name: "germanium" },
    Element { z: 33, symbol: "As", name: "arsenic" },
    Element { z: 34, symbol: "Se", name: "selenium" },
    Element { z: 35, symbol: "Br", name: "bromine" },
    Element { z: 36, symbol: "Kr", name: "krypton" },
    Element { z: 37, symbol: "Rb", name: "rubidium" },
    Element { z: 38, symbol: "Sr", name: "strontium" },
    Element { z: 39, symbol: "Y", name: "yttrium" },
    Element { z: 40, symbol: "Zr", name: "zirconium" },
    Element { z: 41, symbol: "Nb", name: "niobium" },
    Element { z: 42, symbol: "Mo", name: "molybdenum" },
    Element { z: 43, symbol: "Tc", name: "technetium" },
    Element { z: 44, symbol: "Ru", name: "ruthenium" },
    Element { z: 45, symbol: "Rh", name: "rhodium" },
    Element { z: 46, symbol: "Pd", name: "palladium" },
    Element { z: 47, symbol: "Ag", name: "silver" },
    Element { z: 48, symbol: "Cd", name: "cadmium" },
    Element { z: 49, symbol: "In", name: "indium" },
    Element { z: 50, symbol: "Sn", name: "tin" },
    Element { z: 51, symbol: "Sb", name: "antimony" },
    Element { z: 52, symbol: "Te", name: "tellurium" },
    Element { z: 53, symbol: "I", name: "iodine" },
    Element { z: 54, symbol: "Xe", name: "xenon" },
    Element { z: 55, symbol: "Cs", name: "cesium" },
    Element { z: 56, symbol: "Ba", name: "barium" },
    Element { z: 57, symbol: "La", name: "lanthanum" },
    Element { z: 58, symbol: "Ce", name: "cerium" },
    Element { z: 59, symbol: "Pr", name: "praseodymium" },
    Element { z: 60, symbol: "Nd", name: "neodymium" },
    Element { z: 61, symbol: "Pm", name: "promethium" },
    Element { z: 62, symbol: "Sm", name: "samarium" },
    Element { z: 63, symbol: "Eu", name: "europium" },
    Element { z: 64, symbol: "Gd", name: "gadolinium" },
    Element { z: 65, symbol: "Tb", name: "terbium" },
    Element { z: 66, symbol: "Dy", name: "dysprosium" },
    Element { z: 67, symbol: "Ho", name: "holmium" },
    Element { z: 68, symbol: "Er", name: "erbium" },
    Element { z: 69, symbol: "Tm", name: "thulium" },
    Element { z: 70, symbol: "Yb", name: "ytterbium" },
    Element { z: 71, symbol: "Lu", name: "lutetium" },
    Element { z: 72, symbol: "Hf", name: "hafnium" },
    Element { z: 73, symbol: "Ta", name: "tantalum" },
    Element { z: 74, symbol: "W", name: "tungsten" },
    Element { z: 75, symbol: "Re", name: "rhenium" },
    Element { z: 76, symbol: "Os", name: "osmium" },
    Element { z: 77, symbol: "Ir", name: "iridium" },
    Element { z: 78, symbol: "Pt", name: "platinum" },
    Element { z: 79, symbol: "Au", name: "gold" },
    Element { z: 80, symbol: "Hg", name: "mercury" },
    Element { z: 81, symbol: "Tl", name: "thallium" },
    Element { z: 82, symbol: "Pb", name: "lead" },
    Element { z: 83, symbol: "Bi", name: "bismuth" },
    Element { z: 84, symbol: "Po", name: "polonium" },
    Element { z: 85, symbol: "At", name: "astatine" },
    Element { z: 86, symbol: "Rn", name: "radon" },
    Element { z: 87, symbol: "Fr", name: "francium" },
    Element { z: 88, symbol: "Ra", name: "radium" },
    Element { z: 89, symbol: "Ac", name: "actinium" },
    Element { z: 90, symbol: "Th", name: "thorium" },
    Element { z: 91, symbol: "Pa", name: "protactinium" },
    Element { z: 92, symbol: "U", name: "uranium" },
    Element { z: 93, symbol: "Np", name: "neptunium" },
    Element { z: 94, symbol: "Pu", name: "plutonium" },
    Element { z: 95, symbol: "Am", name: "americium" },
    Element { z: 96, symbol: "Cm", name: "curium" },
    Element { z: 97, symbol: "Bk", name: "berkelium" },
    Element { z: 98, symbol: "Cf", name: "californium" },
    Element { z: 99, symbol: "Es", name: "einsteinium" },
    Element { z: 100, symbol: "Fm", name: "fermium" },
    Element { z: 101, symbol: "Md", name: "mendelevium" },
    Element { z: 102, symbol: "No", name: "nobelium" },
    Element { z: 103, symbol: "Lr", name: "lawrencium" },
    Element { z: 104, symbol: "Rf", name: "rutherfordium" },
    Element { z: 105, symbol: "Db", name: "dubnium" },
    Element { z: 106, symbol: "Sg", name: "seaborgium" },
    Element { z: 107, symbol: "Bh", name: "bohrium" },
    Element { z: 108, symbol: "Hs", name: "hassium" },
    Element { z: 109, symbol: "Mt", name: "meitnerium" },
    Element { z: 110, symbol: "Ds", name: "darmstadtium" },
    Element { z: 111, symbol: "Rg", name: "roentgenium" },
    Element { z: 112, symbol: "Cn", name: "copernicium" },
    Element { z: 113, symbol: "Nh", name: "nihonium" },
    Element { z: 114, symbol: "Fl", name: "flerovium" },
    Element { z: 115, symbol: "Mc", name: "moscovium" },
    Element { z: 116, symbol: "Lv", name: "livermorium" },
    Element { z: 117, symbol: "Ts", name: "tennessine" },
    Element { z: 118, symbol: "Og", name: "oganesson" },
];

/// Looks up an element by its symbol, ignoring case ("he", "He" and "HE" all match).
pub fn lookup_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS
        .iter()
        .find(|el| el.symbol.eq_ignore_ascii_case(symbol))
}

/// Looks up an element by atomic number; Z = 0 gives the neutron.
pub fn lookup_z(z: u32) -> Option<&'static Element> {
    if z == 0 {
        return Some(&NEUTRON);
    }
    ELEMENTS.get(z as usize - 1)
}
