//! Canned content for the simulator backend.

pub struct SectionTemplate {
    pub title: &'static str,
    pub content: &'static str,
    pub key_points: &'static [&'static str],
    pub examples: &'static [&'static str],
    pub analogies: &'static [&'static str],
}

pub struct NoteTemplate {
    pub topic: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub sections: &'static [SectionTemplate],
}

pub struct CardTemplate {
    pub question: &'static str,
    pub answer: &'static str,
    pub example: &'static str,
}

/// One explanation per depth level.
pub struct DepthTexts {
    pub basic: &'static str,
    pub intermediate: &'static str,
    pub advanced: &'static str,
    pub comprehensive: &'static str,
}

impl DepthTexts {
    /// Text for a depth, intermediate for anything unrecognized.
    pub fn at(&self, depth: &str) -> &'static str {
        match depth {
            "basic" => self.basic,
            "advanced" => self.advanced,
            "comprehensive" => self.comprehensive,
            _ => self.intermediate,
        }
    }
}

pub struct ConceptExtras {
    pub examples: &'static [&'static str],
    pub related_concepts: &'static [&'static str],
    pub practice_questions: &'static [&'static str],
}

pub static NOTE_TEMPLATES: &[NoteTemplate] = &[
    NoteTemplate {
        topic: "photosynthesis",
        title: "Photosynthesis: Converting Light to Energy",
        summary: "The process by which plants convert sunlight, carbon dioxide, and water into glucose and oxygen.",
        sections: &[
            SectionTemplate {
                title: "Light-Dependent Reactions",
                content: "Occur in the thylakoids of chloroplasts. Chlorophyll absorbs light energy and converts it to chemical energy (ATP and NADPH).",
                key_points: &["Occurs in thylakoids", "Produces ATP and NADPH", "Releases oxygen as byproduct"],
                examples: &["Chlorophyll a and b absorption", "Photosystem I and II"],
                analogies: &["Like solar panels converting sunlight to electricity"],
            },
            SectionTemplate {
                title: "Light-Independent Reactions (Calvin Cycle)",
                content: "Occur in the stroma. Uses ATP and NADPH to convert CO2 into glucose through carbon fixation.",
                key_points: &["Occurs in stroma", "Uses ATP and NADPH", "Produces glucose"],
                examples: &["RuBisCO enzyme function", "3-carbon and 6-carbon compounds"],
                analogies: &["Like a factory assembly line building sugar molecules"],
            },
        ],
    },
    NoteTemplate {
        topic: "derivatives",
        title: "Calculus Derivatives: Rate of Change",
        summary: "Derivatives measure the instantaneous rate of change of a function at any given point.",
        sections: &[
            SectionTemplate {
                title: "Basic Definition",
                content: "The derivative of f(x) is the limit of [f(x+h) - f(x)]/h as h approaches 0.",
                key_points: &["Measures instantaneous rate of change", "Slope of tangent line", "Limit definition"],
                examples: &["f'(x) = lim(h→0) [f(x+h) - f(x)]/h"],
                analogies: &["Like reading a speedometer at an exact moment"],
            },
            SectionTemplate {
                title: "Common Rules",
                content: "Power rule, product rule, quotient rule, and chain rule for finding derivatives.",
                key_points: &[
                    "Power rule: d/dx(x^n) = nx^(n-1)",
                    "Product rule: (uv)' = u'v + uv'",
                    "Chain rule: (f(g(x)))' = f'(g(x))g'(x)",
                ],
                examples: &["d/dx(x³) = 3x²", "d/dx(sin(2x)) = 2cos(2x)"],
                analogies: &["Like following recipes for different types of functions"],
            },
        ],
    },
];

pub static FLASHCARD_TEMPLATES: &[(&str, &[CardTemplate])] = &[
    (
        "spanish",
        &[
            CardTemplate {
                question: "How do you say 'hello' in Spanish?",
                answer: "Hola",
                example: "¡Hola! ¿Cómo estás?",
            },
            CardTemplate {
                question: "What is 'goodbye' in Spanish?",
                answer: "Adiós",
                example: "¡Adiós! Hasta mañana.",
            },
            CardTemplate {
                question: "How do you say 'please' in Spanish?",
                answer: "Por favor",
                example: "¿Puedes ayudarme, por favor?",
            },
            CardTemplate {
                question: "What is 'thank you' in Spanish?",
                answer: "Gracias",
                example: "Muchas gracias por tu ayuda.",
            },
            CardTemplate {
                question: "How do you say 'excuse me' in Spanish?",
                answer: "Disculpe",
                example: "Disculpe, ¿dónde está el baño?",
            },
        ],
    ),
    (
        "derivatives",
        &[
            CardTemplate {
                question: "What is the derivative of x²?",
                answer: "2x",
                example: "Using power rule: d/dx(x²) = 2x¹ = 2x",
            },
            CardTemplate {
                question: "What is the power rule for derivatives?",
                answer: "d/dx(xⁿ) = nxⁿ⁻¹",
                example: "d/dx(x³) = 3x²",
            },
            CardTemplate {
                question: "What is the derivative of sin(x)?",
                answer: "cos(x)",
                example: "d/dx(sin(x)) = cos(x)",
            },
            CardTemplate {
                question: "What is the derivative of eˣ?",
                answer: "eˣ",
                example: "d/dx(eˣ) = eˣ (special property)",
            },
            CardTemplate {
                question: "What is the chain rule?",
                answer: "(f(g(x)))' = f'(g(x))g'(x)",
                example: "d/dx(sin(2x)) = cos(2x) · 2 = 2cos(2x)",
            },
        ],
    ),
    (
        "photosynthesis",
        &[
            CardTemplate {
                question: "What is the overall equation for photosynthesis?",
                answer: "6CO₂ + 6H₂O + light → C₆H₁₂O₆ + 6O₂",
                example: "Carbon dioxide + water + light energy → glucose + oxygen",
            },
            CardTemplate {
                question: "Where do light-dependent reactions occur?",
                answer: "Thylakoids",
                example: "In the thylakoid membranes of chloroplasts",
            },
            CardTemplate {
                question: "What does the Calvin cycle produce?",
                answer: "Glucose (C₆H₁₂O₆)",
                example: "Uses CO₂ and energy to make sugar",
            },
            CardTemplate {
                question: "What pigment captures light energy?",
                answer: "Chlorophyll",
                example: "Chlorophyll a and b absorb different wavelengths",
            },
            CardTemplate {
                question: "What are the products of light reactions?",
                answer: "ATP, NADPH, and O₂",
                example: "Energy carriers and oxygen gas",
            },
        ],
    ),
];

pub static EXPLANATIONS: &[(&str, DepthTexts)] = &[
    (
        "quantum mechanics",
        DepthTexts {
            basic: "Quantum mechanics is the science of very small things like atoms and particles. It shows that these tiny things behave very differently from the big objects we see every day.",
            intermediate: "Quantum mechanics is a fundamental theory in physics that describes the behavior of matter and energy at the atomic and subatomic scale. It reveals that particles can exist in multiple states simultaneously and that observation affects reality.",
            advanced: "Quantum mechanics is a mathematical framework describing the probabilistic behavior of quantum systems through wave functions, operators, and the Schrödinger equation, incorporating principles like superposition, entanglement, and wave-particle duality.",
            comprehensive: "Quantum mechanics represents a complete theoretical framework for understanding the fundamental nature of reality at the quantum scale, incorporating advanced concepts like quantum field theory, many-worlds interpretation, and the measurement problem in quantum foundations.",
        },
    ),
    (
        "photosynthesis",
        DepthTexts {
            basic: "Photosynthesis is how plants make food using sunlight, water, and carbon dioxide.",
            intermediate: "Photosynthesis is a complex process where plants convert light energy into chemical energy (glucose) through two main stages: light-dependent reactions and the Calvin cycle.",
            advanced: "Photosynthesis involves intricate biochemical pathways including photosystem complexes, electron transport chains, and carbon fixation mechanisms that convert electromagnetic radiation into stored chemical energy.",
            comprehensive: "Photosynthesis represents a fundamental energy conversion process involving quantum mechanical light absorption, redox chemistry, and metabolic regulation that sustains virtually all life on Earth through primary productivity.",
        },
    ),
    (
        "derivatives",
        DepthTexts {
            basic: "A derivative tells you how fast something is changing at any moment.",
            intermediate: "A derivative measures the instantaneous rate of change of a function, representing the slope of the tangent line at any point.",
            advanced: "Derivatives are linear operators that quantify local rates of change through limit processes, forming the foundation of differential calculus and optimization theory.",
            comprehensive: "Derivatives represent the fundamental concept of local linearity in analysis, providing the mathematical framework for understanding dynamic systems, optimization, and the geometric properties of manifolds.",
        },
    ),
    (
        "atoms",
        DepthTexts {
            basic: "Atoms are tiny building blocks that make up everything around us.",
            intermediate: "Atoms are the smallest units of matter that retain the properties of an element, consisting of protons, neutrons, and electrons.",
            advanced: "Atoms are quantum mechanical systems where electrons exist in probability distributions around nuclei, governed by the Schrödinger equation and quantum numbers.",
            comprehensive: "Atoms represent discrete quantum systems exhibiting wave-particle duality, with electronic structure determined by solutions to the many-body Schrödinger equation in the context of quantum field theory.",
        },
    ),
    (
        "p block elements",
        DepthTexts {
            basic: "P block elements are found on the right side of the periodic table and include groups 13-18. They have their outermost electrons in p orbitals.",
            intermediate: "P block elements include metals, metalloids, and nonmetals with diverse properties. Their electron configuration ends in p¹ to p⁶, giving them varied chemical behaviors from reactive halogens to inert noble gases.",
            advanced: "P block elements exhibit complex bonding patterns due to the directional nature of p orbitals, leading to hybridization, multiple oxidation states, and both ionic and covalent compounds with diverse geometries.",
            comprehensive: "P block elements demonstrate the full spectrum of chemical bonding theory, from electron-deficient bonding in boron compounds to hypervalency in phosphorus and sulfur, illustrating molecular orbital theory and VSEPR geometry.",
        },
    ),
    (
        "periodic table",
        DepthTexts {
            basic: "The periodic table organizes all chemical elements by their properties and atomic structure.",
            intermediate: "The periodic table arranges elements by increasing atomic number, showing periodic trends in properties like atomic size, ionization energy, and electronegativity.",
            advanced: "The periodic table reflects the quantum mechanical structure of atoms, with periods corresponding to electron shells and groups reflecting similar valence electron configurations and chemical properties.",
            comprehensive: "The periodic table embodies the fundamental principles of quantum chemistry, demonstrating how electron configuration determines chemical behavior through effective nuclear charge, orbital penetration, and relativistic effects in heavy elements.",
        },
    ),
];

pub static CONCEPT_EXTRAS: &[(&str, ConceptExtras)] = &[
    (
        "quantum mechanics",
        ConceptExtras {
            examples: &[
                "Electron tunneling in quantum devices like tunnel diodes",
                "Superposition in quantum computers using qubits",
                "Wave-particle duality demonstrated in double-slit experiments",
            ],
            related_concepts: &[
                "Wave-particle duality",
                "Heisenberg uncertainty principle",
                "Schrödinger equation",
            ],
            practice_questions: &[
                "How does quantum superposition enable quantum computing?",
                "What role does observation play in quantum measurement?",
                "How do quantum tunneling effects work in modern electronics?",
            ],
        },
    ),
    (
        "photosynthesis",
        ConceptExtras {
            examples: &[
                "Light reactions in chloroplasts converting sunlight to ATP",
                "Calvin cycle fixing CO₂ into glucose in plant leaves",
                "Oxygen production as a byproduct in aquatic plants",
            ],
            related_concepts: &[
                "Cellular respiration",
                "Chlorophyll and light absorption",
                "Carbon fixation pathways",
            ],
            practice_questions: &[
                "How do light and dark reactions work together in photosynthesis?",
                "What factors can limit the rate of photosynthesis?",
                "How does photosynthesis contribute to the global carbon cycle?",
            ],
        },
    ),
    (
        "p block elements",
        ConceptExtras {
            examples: &[
                "Halogens like chlorine used in water purification",
                "Noble gases like helium used in balloons and diving",
                "Carbon forming diverse compounds in organic chemistry",
            ],
            related_concepts: &[
                "Periodic trends in p block",
                "Electronegativity and ionization energy",
                "Chemical bonding patterns",
            ],
            practice_questions: &[
                "How do p block elements show variable oxidation states?",
                "What makes noble gases chemically inert?",
                "How does electronegativity change across p block groups?",
            ],
        },
    ),
    (
        "derivatives",
        ConceptExtras {
            examples: &[
                "Velocity as the derivative of position with respect to time",
                "Marginal cost in economics as derivative of total cost",
                "Slope of tangent lines to curves at specific points",
            ],
            related_concepts: &[
                "Limits and continuity",
                "Integration (antiderivatives)",
                "Chain rule and product rule",
            ],
            practice_questions: &[
                "How do you find the derivative of composite functions?",
                "What is the relationship between derivatives and rates of change?",
                "How are derivatives used in optimization problems?",
            ],
        },
    ),
];
