use std::sync::OnceLock;

type AnswerPoints = &'static [(&'static str, u32)];

/// Behavioural profile questions and the points each answer is worth.
const STANDARD_POINTS: &[(&str, AnswerPoints)] = &[
    (
        "prefereTrabalho",
        &[
            ("Individualmente", 2),
            ("Em equipe", 4),
            ("Depende da situação", 3),
            ("Não tenho preferência", 1),
        ],
    ),
    (
        "lidaFeedback",
        &[
            ("Aceito bem e busco melhorar", 4),
            ("Fico defensivo, mas tento entender", 3),
            ("Ignoro feedbacks", 0),
            ("Não gosto de feedbacks", 0),
        ],
    ),
    (
        "resolveConflito",
        &[
            ("Ignoraria o problema", 1),
            (
                "Conversaria com as partes envolvidas para entender e resolver",
                4,
            ),
            ("Tentaria resolver sozinho(a)", 1),
            ("Não sei responder", 0),
        ],
    ),
    (
        "importanteAmbiente",
        &[
            ("Salário e benefícios", 2),
            ("Oportunidades de crescimento", 4),
            ("Ambiente de trabalho e cultura da empresa", 3),
            ("Não sei responder", 0),
        ],
    ),
    (
        "organizacao",
        &[
            ("Anoto tudo em papel", 3),
            ("Utilizo aplicativos de organização", 3),
            ("Tenho boa memória, não preciso de organização", 2),
            ("Organização não é meu ponto forte", 0),
        ],
    ),
    (
        "pressao",
        &[
            ("Não gosto e não me saio bem", 0),
            ("Consigo lidar bem com prazos apertados", 4),
            ("Não me importo com pressão", 4),
            ("Varia conforme a situação", 3),
        ],
    ),
    (
        "abordagemIndeciso",
        &[
            ("Pressiono-os a tomar uma decisão rápida", 2),
            ("Ofereço informações detalhadas e sugestões personalizadas", 4),
            ("Deixo que decidam por conta própria sem intervenção", 2),
            ("Não tenho experiência nesse tipo de situação", 1),
        ],
    ),
    (
        "abordagemCliente",
        &[
            ("Seria direto e objetivo sobre as vantagens do imóvel", 4),
            (
                "Faria perguntas para entender suas necessidades e oferecer opções adequadas",
                4,
            ),
            ("Não tenho experiência nesse tipo de abordagem", 1),
            ("Não me sinto confortável fazendo isso", 0),
        ],
    ),
    (
        "mostrarImovel",
        &[
            ("Destacar apenas os pontos positivos", 4),
            (
                "Ser honesto sobre todas as características, positivas e negativas",
                3,
            ),
            ("Não tenho experiência em mostrar imóveis", 1),
            ("Não sei responder", 0),
        ],
    ),
    (
        "gerenciarTempo",
        &[
            ("Priorizaria clientes mais fáceis de lidar", 2),
            ("Tentaria atender todos de forma equitativa", 4),
            ("Não me sinto confortável gerenciando múltiplos clientes", 1),
            ("Não sei responder", 0),
        ],
    ),
    (
        "comunicacao",
        &[
            ("Assertivo e direto", 3),
            ("Empático e paciente", 3),
            ("Flexível, adaptando-se às necessidades do cliente", 4),
            ("Varia conforme a situação", 1),
        ],
    ),
    (
        "motivacaoAmbiente",
        &[
            ("Com reconhecimento e incentivos financeiros", 3),
            ("Com metas pessoais e profissionais claras", 4),
            ("Não preciso de motivação externa", 1),
            ("Não me sinto motivado(a) em ambientes desafiadores", 0),
        ],
    ),
];

/// Answer → points map for one scored question.
#[derive(Debug, Clone, Copy)]
pub struct QuestionPoints {
    key: &'static str,
    answers: AnswerPoints,
    max_points: u32,
}

impl QuestionPoints {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn max_points(&self) -> u32 {
        self.max_points
    }

    pub fn answers(&self) -> impl Iterator<Item = &'static str> {
        let answers = self.answers;
        answers.iter().map(|(answer, _)| *answer)
    }

    /// Unrecognised answers are worth nothing.
    pub fn points_for(&self, answer: &str) -> u32 {
        self.answers
            .iter()
            .find(|(candidate, _)| *candidate == answer)
            .map(|(_, points)| *points)
            .unwrap_or(0)
    }
}

/// Static points table plus the maximum attainable total, computed once.
#[derive(Debug, Clone)]
pub struct AnswerPointsTable {
    questions: Vec<QuestionPoints>,
    max_possible_score: u32,
}

impl AnswerPointsTable {
    pub fn new(entries: &'static [(&'static str, AnswerPoints)]) -> Self {
        let questions: Vec<QuestionPoints> = entries
            .iter()
            .map(|&(key, answers)| QuestionPoints {
                key,
                answers,
                max_points: answers.iter().map(|(_, points)| *points).max().unwrap_or(0),
            })
            .collect();
        let max_possible_score = questions.iter().map(QuestionPoints::max_points).sum();

        Self {
            questions,
            max_possible_score,
        }
    }

    /// Process-wide questionnaire table.
    pub fn standard() -> &'static Self {
        static TABLE: OnceLock<AnswerPointsTable> = OnceLock::new();
        TABLE.get_or_init(|| Self::new(STANDARD_POINTS))
    }

    pub fn questions(&self) -> &[QuestionPoints] {
        &self.questions
    }

    pub fn question(&self, key: &str) -> Option<&QuestionPoints> {
        self.questions.iter().find(|question| question.key == key)
    }

    pub fn max_possible_score(&self) -> u32 {
        self.max_possible_score
    }
}
